//! Which of the user's items each friend also interacted with

use foodigram_core::{Catalog, ItemId, SocialEntry};
use serde::Serialize;
use std::collections::BTreeSet;

use crate::InteractionStore;

/// One friend and the items both of you liked or scrapped
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FriendOverlap {
    pub friend: SocialEntry,
    /// Shared ids, in the friend's own order
    pub item_ids: Vec<ItemId>,
    /// Display names for the shared ids that could be resolved
    pub item_names: Vec<String>,
}

impl FriendOverlap {
    pub fn is_empty(&self) -> bool {
        self.item_ids.is_empty()
    }
}

/// Ids in the friend's list that the user also liked or scrapped.
///
/// Keeps the friend's order and drops repeats.
pub fn mutual_interactions(friend: &SocialEntry, interacted: &BTreeSet<ItemId>) -> Vec<ItemId> {
    let mut seen = BTreeSet::new();
    friend
        .mutual_interaction_ids
        .iter()
        .copied()
        .filter(|id| interacted.contains(id) && seen.insert(*id))
        .collect()
}

/// Overlap for every friend in the catalog, in catalog order.
///
/// Names come from the catalog first, then from scrapped snapshots. An id
/// that resolves through neither still counts but has no name.
pub fn friends_overlap(catalog: &Catalog, store: &InteractionStore) -> Vec<FriendOverlap> {
    let interacted = store.interacted_ids();

    catalog
        .friends()
        .iter()
        .map(|friend| {
            let item_ids = mutual_interactions(friend, &interacted);
            let item_names = item_ids
                .iter()
                .filter_map(|&id| catalog.get(id).or_else(|| store.scrapped_item(id)))
                .map(|item| item.name.clone())
                .collect();

            FriendOverlap {
                friend: friend.clone(),
                item_ids,
                item_names,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use foodigram_core::{Category, ContentItem};

    fn catalog() -> Catalog {
        Catalog::new(
            vec![
                ContentItem::new(1, "Bibimbap", Category::Korean),
                ContentItem::new(2, "Sushi", Category::Japanese),
                ContentItem::new(3, "Dumplings", Category::Chinese),
            ],
            vec![
                SocialEntry::new(100, "Mina").with_interactions([3, 1, 1, 99]),
                SocialEntry::new(101, "Joon").with_interactions([2]),
                SocialEntry::new(102, "Ara"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_mutual_interactions_keep_friend_order() {
        let friend = SocialEntry::new(1, "Mina").with_interactions([3, 1, 1, 2]);
        let interacted = BTreeSet::from([1, 3]);
        assert_eq!(mutual_interactions(&friend, &interacted), vec![3, 1]);
    }

    #[test]
    fn test_overlap_unions_liked_and_scrapped() {
        let catalog = catalog();
        let mut store = InteractionStore::new();
        store.toggle_liked(1);
        store.toggle_scrapped(catalog.get(3).unwrap());

        let overlaps = friends_overlap(&catalog, &store);
        assert_eq!(overlaps.len(), 3);

        assert_eq!(overlaps[0].item_ids, vec![3, 1]);
        assert_eq!(overlaps[0].item_names, vec!["Dumplings", "Bibimbap"]);
        assert!(overlaps[1].is_empty());
        assert!(overlaps[2].is_empty());
    }

    #[test]
    fn test_names_fall_back_to_scrapped_snapshot() {
        let catalog = catalog();
        let mut store = InteractionStore::new();
        store.toggle_scrapped(&ContentItem::new(99, "Retired Special", Category::Burger));

        let overlaps = friends_overlap(&catalog, &store);
        assert_eq!(overlaps[0].item_ids, vec![99]);
        assert_eq!(overlaps[0].item_names, vec!["Retired Special"]);
    }

    #[test]
    fn test_unresolvable_id_has_no_name() {
        let catalog = catalog();
        let mut store = InteractionStore::new();
        store.toggle_liked(99);

        let overlaps = friends_overlap(&catalog, &store);
        assert_eq!(overlaps[0].item_ids, vec![99]);
        assert!(overlaps[0].item_names.is_empty());
    }
}
