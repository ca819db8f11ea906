//! Liked and scrapped toggle sets

use chrono::{DateTime, Utc};
use foodigram_core::{ContentItem, ItemId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// A scrapped item, denormalized so history outlives catalog changes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrappedEntry {
    pub item: ContentItem,
    pub scrapped_at: DateTime<Utc>,
}

impl ScrappedEntry {
    pub fn new(item: ContentItem) -> Self {
        Self {
            item,
            scrapped_at: Utc::now(),
        }
    }
}

/// Two independent membership sets over item ids.
///
/// Liked holds bare ids and is session-scoped. Scrapped holds full item
/// snapshots in the order they were scrapped and is meant to be persisted.
/// An item may be in both, either or neither.
///
/// The store does not know about the catalog; it accepts any id.
#[derive(Debug, Clone, Default)]
pub struct InteractionStore {
    liked: BTreeSet<ItemId>,
    scrapped: Vec<ScrappedEntry>,
    revision: u64,
}

impl InteractionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip liked membership; returns the new state
    pub fn toggle_liked(&mut self, id: ItemId) -> bool {
        let liked = if self.liked.remove(&id) {
            false
        } else {
            self.liked.insert(id);
            true
        };
        self.revision += 1;
        debug!(id, liked, "toggled liked");
        liked
    }

    /// Flip scrapped membership by the item's id; returns the new state
    pub fn toggle_scrapped(&mut self, item: &ContentItem) -> bool {
        let scrapped = match self.scrapped.iter().position(|e| e.item.id == item.id) {
            Some(pos) => {
                self.scrapped.remove(pos);
                false
            }
            None => {
                self.scrapped.push(ScrappedEntry::new(item.clone()));
                true
            }
        };
        self.revision += 1;
        debug!(id = item.id, scrapped, "toggled scrapped");
        scrapped
    }

    pub fn is_liked(&self, id: ItemId) -> bool {
        self.liked.contains(&id)
    }

    pub fn is_scrapped(&self, id: ItemId) -> bool {
        self.scrapped.iter().any(|e| e.item.id == id)
    }

    pub fn liked_ids(&self) -> &BTreeSet<ItemId> {
        &self.liked
    }

    /// Scrapped entries, oldest first
    pub fn scrapped_entries(&self) -> &[ScrappedEntry] {
        &self.scrapped
    }

    /// Scrapped entries, most recent first
    pub fn scrapped_history(&self) -> impl Iterator<Item = &ScrappedEntry> + '_ {
        self.scrapped.iter().rev()
    }

    /// Ids the user liked or scrapped
    pub fn interacted_ids(&self) -> BTreeSet<ItemId> {
        self.liked
            .iter()
            .copied()
            .chain(self.scrapped.iter().map(|e| e.item.id))
            .collect()
    }

    /// Snapshot of a scrapped item, looked up by id
    pub fn scrapped_item(&self, id: ItemId) -> Option<&ContentItem> {
        self.scrapped
            .iter()
            .find(|e| e.item.id == id)
            .map(|e| &e.item)
    }

    /// Replace scrapped history with persisted entries.
    ///
    /// A repeated id keeps its first occurrence. Returns the number kept.
    pub fn restore_scrapped(&mut self, entries: Vec<ScrappedEntry>) -> usize {
        let mut seen = BTreeSet::new();
        self.scrapped = entries
            .into_iter()
            .filter(|e| seen.insert(e.item.id))
            .collect();
        self.revision += 1;
        self.scrapped.len()
    }

    /// Bumped on every mutation of either set
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foodigram_core::Category;

    fn item(id: ItemId) -> ContentItem {
        ContentItem::new(id, format!("Item {id}"), Category::Western)
    }

    #[test]
    fn test_toggle_liked_twice_restores() {
        let mut store = InteractionStore::new();
        for id in [0, 1, 42, ItemId::MAX] {
            let before = store.is_liked(id);
            store.toggle_liked(id);
            assert_ne!(store.is_liked(id), before);
            store.toggle_liked(id);
            assert_eq!(store.is_liked(id), before);
        }
        assert!(store.liked_ids().is_empty());
    }

    #[test]
    fn test_toggle_scrapped_twice_restores() {
        let mut store = InteractionStore::new();
        assert!(store.toggle_scrapped(&item(3)));
        assert!(store.is_scrapped(3));
        assert!(!store.toggle_scrapped(&item(3)));
        assert!(!store.is_scrapped(3));
    }

    #[test]
    fn test_sets_are_independent() {
        let mut store = InteractionStore::new();
        store.toggle_liked(1);
        store.toggle_scrapped(&item(1));
        store.toggle_scrapped(&item(2));

        store.toggle_liked(1);
        assert!(!store.is_liked(1));
        assert!(store.is_scrapped(1));
        assert_eq!(store.interacted_ids(), BTreeSet::from([1, 2]));
    }

    #[test]
    fn test_history_most_recent_first() {
        let mut store = InteractionStore::new();
        for id in [5, 6, 7] {
            store.toggle_scrapped(&item(id));
        }

        let ids: Vec<_> = store.scrapped_history().map(|e| e.item.id).collect();
        assert_eq!(ids, vec![7, 6, 5]);
    }

    #[test]
    fn test_revision_bumps_on_every_mutation() {
        let mut store = InteractionStore::new();
        let start = store.revision();
        store.toggle_liked(1);
        store.toggle_scrapped(&item(1));
        assert_eq!(store.revision(), start + 2);
    }

    #[test]
    fn test_restore_dedupes() {
        let mut store = InteractionStore::new();
        let kept = store.restore_scrapped(vec![
            ScrappedEntry::new(item(1)),
            ScrappedEntry::new(item(2)),
            ScrappedEntry::new(item(1)),
        ]);

        assert_eq!(kept, 2);
        assert!(store.is_scrapped(1) && store.is_scrapped(2));
    }
}
