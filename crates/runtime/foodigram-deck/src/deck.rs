//! One session's deck: catalog, criteria, interactions and cursor wired together

use foodigram_core::{Allergen, Catalog, Category, ContentItem, ItemId};
use tracing::{debug, info};

use crate::{
    filter, resolve, social, CursorPosition, FilterCriteria, FilteredView, FriendOverlap,
    InteractionStore, NavigationCursor, TransitionIntent, TransitionSnapshot,
};

/// Inputs the current view was computed from
#[derive(Debug, Clone, PartialEq, Eq)]
struct ViewKey {
    criteria: FilterCriteria,
    /// Only tracked while liked-only is on; other views ignore liked ids
    liked_revision: Option<u64>,
}

/// The swipe deck.
///
/// Every mutating call re-derives the view if its inputs changed, re-clamps
/// the cursor and resolves the transition against the last presented state.
#[derive(Debug)]
pub struct Deck {
    catalog: Catalog,
    criteria: FilterCriteria,
    interactions: InteractionStore,
    cursor: NavigationCursor,
    view: FilteredView,
    view_key: ViewKey,
    presented: TransitionSnapshot,
    last_intent: TransitionIntent,
}

impl Deck {
    /// A fresh deck over the whole catalog
    pub fn new(catalog: Catalog) -> Self {
        Self::with_interactions(catalog, InteractionStore::new())
    }

    /// A deck that starts from restored interaction state
    pub fn with_interactions(catalog: Catalog, interactions: InteractionStore) -> Self {
        let criteria = FilterCriteria::default();
        let view = filter(&catalog, &criteria, interactions.liked_ids());
        let mut cursor = NavigationCursor::new();
        cursor.clamp(view.len());

        info!(
            items = catalog.len(),
            scrapped = interactions.scrapped_entries().len(),
            "deck ready"
        );

        let view_key = ViewKey {
            criteria: criteria.clone(),
            liked_revision: None,
        };

        Self {
            catalog,
            criteria,
            interactions,
            cursor,
            view,
            view_key,
            presented: TransitionSnapshot::default(),
            last_intent: TransitionIntent::None,
        }
    }

    // ============== Reads ==============

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn view(&self) -> &FilteredView {
        &self.view
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn interactions(&self) -> &InteractionStore {
        &self.interactions
    }

    pub fn position(&self) -> CursorPosition {
        self.cursor.position()
    }

    /// The item under the cursor; `None` when the view is empty
    pub fn current(&self) -> Option<&ContentItem> {
        self.position().index().and_then(|i| self.view.get(i))
    }

    pub fn is_at_start(&self) -> bool {
        self.cursor.is_at_start()
    }

    pub fn is_at_end(&self) -> bool {
        self.cursor.is_at_end()
    }

    pub fn snapshot(&self) -> TransitionSnapshot {
        TransitionSnapshot {
            cursor_index: self.cursor.index(),
            liked_only: self.criteria.liked_only,
        }
    }

    /// Intent produced by the most recent mutation
    pub fn last_transition(&self) -> TransitionIntent {
        self.last_intent
    }

    /// Resolve the last presented state against the current one, then mark
    /// the current state as presented
    pub fn transition(&mut self) -> TransitionIntent {
        let current = self.snapshot();
        let intent = resolve(self.presented, current);
        self.presented = current;
        self.last_intent = intent;
        intent
    }

    pub fn friends_overlap(&self) -> Vec<FriendOverlap> {
        social::friends_overlap(&self.catalog, &self.interactions)
    }

    // ============== Navigation ==============

    pub fn next(&mut self) -> TransitionIntent {
        self.apply(|deck| {
            deck.cursor.step_next();
        })
    }

    pub fn prev(&mut self) -> TransitionIntent {
        self.apply(|deck| {
            deck.cursor.step_prev();
        })
    }

    // ============== Interactions ==============

    /// Toggle liked on the current item; `None` when there is none
    pub fn like_current(&mut self) -> Option<bool> {
        let Some(id) = self.current().map(|item| item.id) else {
            self.last_intent = TransitionIntent::None;
            return None;
        };
        self.toggle_liked(id)
    }

    /// Toggle scrapped on the current item; `None` when there is none
    pub fn scrap_current(&mut self) -> Option<bool> {
        let Some(item) = self.current().cloned() else {
            self.last_intent = TransitionIntent::None;
            return None;
        };
        Some(self.toggle_scrapped(&item))
    }

    /// Toggle liked by id. Ids the catalog does not carry are ignored.
    pub fn toggle_liked(&mut self, id: ItemId) -> Option<bool> {
        if !self.catalog.contains(id) {
            debug!(id, "ignoring like for unknown item");
            self.last_intent = TransitionIntent::None;
            return None;
        }
        let mut liked = false;
        self.apply(|deck| liked = deck.interactions.toggle_liked(id));
        Some(liked)
    }

    /// Toggle scrapped for any item snapshot, in the catalog or not
    pub fn toggle_scrapped(&mut self, item: &ContentItem) -> bool {
        let mut scrapped = false;
        self.apply(|deck| scrapped = deck.interactions.toggle_scrapped(item));
        scrapped
    }

    // ============== Criteria ==============

    /// Update the search text as it is typed; the cursor is only re-clamped
    pub fn set_search(&mut self, text: impl Into<String>) -> TransitionIntent {
        let text = text.into();
        self.apply(|deck| deck.criteria.set_search(text))
    }

    /// Commit a search and go back to the first result
    pub fn submit_search(&mut self, text: impl Into<String>) -> TransitionIntent {
        let text = text.into();
        self.apply(|deck| {
            deck.criteria.set_search(text);
            deck.cursor.reset();
        })
    }

    pub fn clear_search(&mut self) -> TransitionIntent {
        self.apply(|deck| deck.criteria.clear_search())
    }

    pub fn toggle_category(&mut self, category: Category) -> TransitionIntent {
        self.apply(|deck| {
            deck.criteria.toggle_category(category);
        })
    }

    pub fn select_all_categories(&mut self) -> TransitionIntent {
        self.apply(|deck| deck.criteria.select_all_categories())
    }

    pub fn clear_categories(&mut self) -> TransitionIntent {
        self.apply(|deck| deck.criteria.clear_categories())
    }

    pub fn toggle_allergen(&mut self, allergen: Allergen) -> TransitionIntent {
        self.apply(|deck| {
            deck.criteria.toggle_allergen(allergen);
        })
    }

    pub fn clear_allergens(&mut self) -> TransitionIntent {
        self.apply(|deck| deck.criteria.clear_allergens())
    }

    pub fn set_liked_only(&mut self, liked_only: bool) -> TransitionIntent {
        self.apply(|deck| deck.criteria.set_liked_only(liked_only))
    }

    pub fn toggle_liked_only(&mut self) -> TransitionIntent {
        self.apply(|deck| {
            deck.criteria.toggle_liked_only();
        })
    }

    /// Replace every predicate at once
    pub fn set_criteria(&mut self, criteria: FilterCriteria) -> TransitionIntent {
        self.apply(|deck| deck.criteria = criteria)
    }

    // ============== Internals ==============

    fn apply(&mut self, mutate: impl FnOnce(&mut Self)) -> TransitionIntent {
        mutate(self);
        self.refresh();
        self.transition()
    }

    fn refresh(&mut self) {
        let key = ViewKey {
            criteria: self.criteria.clone(),
            liked_revision: self
                .criteria
                .liked_only
                .then(|| self.interactions.revision()),
        };

        if key != self.view_key {
            self.view = filter(&self.catalog, &self.criteria, self.interactions.liked_ids());
            self.view_key = key;
        }

        self.cursor.clamp(self.view.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foodigram_core::SocialEntry;

    fn catalog() -> Catalog {
        Catalog::new(
            vec![
                ContentItem::new(1, "Bibimbap", Category::Korean).with_keywords(["rice"]),
                ContentItem::new(2, "Ramen", Category::Japanese)
                    .with_keywords(["noodles"])
                    .with_allergens([Allergen::Wheat, Allergen::Eggs]),
                ContentItem::new(3, "Cheeseburger", Category::Burger)
                    .with_allergens([Allergen::Milk, Allergen::Wheat]),
                ContentItem::new(4, "Margherita", Category::Pizza)
                    .with_allergens([Allergen::Milk, Allergen::Wheat]),
            ],
            vec![SocialEntry::new(10, "Mina").with_interactions([2, 4])],
        )
        .unwrap()
    }

    #[test]
    fn test_fresh_deck_shows_whole_catalog() {
        let deck = Deck::new(catalog());
        assert_eq!(deck.view().len(), 4);
        assert_eq!(deck.current().map(|i| i.id), Some(1));
        assert_eq!(deck.last_transition(), TransitionIntent::None);
    }

    #[test]
    fn test_liked_only_with_nothing_liked() {
        let mut deck = Deck::new(catalog());
        deck.set_liked_only(true);

        assert!(deck.view().is_empty());
        assert_eq!(deck.position(), CursorPosition::Empty);
        assert!(deck.current().is_none());
        assert_eq!(deck.next(), TransitionIntent::None);
        assert!(deck.like_current().is_none());
    }

    #[test]
    fn test_narrowing_view_resets_cursor() {
        let mut deck = Deck::new(catalog());
        deck.next();
        deck.next();
        assert_eq!(deck.position(), CursorPosition::At(2));

        deck.clear_categories();
        deck.toggle_category(Category::Korean);
        assert_eq!(deck.position(), CursorPosition::At(0));
        assert_eq!(deck.current().map(|i| i.id), Some(1));
    }

    #[test]
    fn test_forward_then_replace() {
        let mut deck = Deck::new(catalog());
        assert_eq!(deck.like_current(), Some(true));
        deck.toggle_liked(2);

        assert_eq!(deck.next(), TransitionIntent::Forward);
        assert_eq!(deck.set_liked_only(true), TransitionIntent::Replace);
        assert_eq!(deck.view().ids(), vec![1, 2]);

        assert_eq!(deck.prev(), TransitionIntent::Backward);
        assert_eq!(deck.prev(), TransitionIntent::None);
    }

    #[test]
    fn test_unliking_in_liked_only_view_recomputes() {
        let mut deck = Deck::new(catalog());
        deck.toggle_liked(3);
        deck.toggle_liked(4);
        deck.set_liked_only(true);
        deck.next();
        assert_eq!(deck.current().map(|i| i.id), Some(4));

        assert_eq!(deck.like_current(), Some(false));
        assert_eq!(deck.view().ids(), vec![3]);
        assert_eq!(deck.position(), CursorPosition::At(0));
    }

    #[test]
    fn test_unknown_id_is_ignored() {
        let mut deck = Deck::new(catalog());
        assert_eq!(deck.toggle_liked(999), None);
        assert!(deck.interactions().liked_ids().is_empty());

        let outside = ContentItem::new(999, "Off-menu", Category::Chicken);
        assert!(deck.toggle_scrapped(&outside));
        assert!(deck.interactions().is_scrapped(999));
    }

    #[test]
    fn test_ignored_toggle_clears_last_transition() {
        let mut deck = Deck::new(catalog());
        assert_eq!(deck.next(), TransitionIntent::Forward);
        assert_eq!(deck.toggle_liked(999), None);
        assert_eq!(deck.last_transition(), TransitionIntent::None);

        assert_eq!(deck.set_liked_only(true), TransitionIntent::Replace);
        assert!(deck.current().is_none());
        assert_eq!(deck.like_current(), None);
        assert_eq!(deck.last_transition(), TransitionIntent::None);

        deck.set_liked_only(false);
        assert_eq!(deck.last_transition(), TransitionIntent::Replace);
        deck.set_liked_only(true);
        assert_eq!(deck.scrap_current(), None);
        assert_eq!(deck.last_transition(), TransitionIntent::None);
    }

    #[test]
    fn test_submit_search_resets_cursor() {
        let mut deck = Deck::new(catalog());
        deck.next();
        deck.next();

        deck.set_search("e");
        assert_eq!(deck.position(), CursorPosition::At(2));

        assert_eq!(deck.submit_search("e"), TransitionIntent::Backward);
        assert_eq!(deck.position(), CursorPosition::At(0));
    }

    #[test]
    fn test_allergen_filter() {
        let mut deck = Deck::new(catalog());
        deck.toggle_allergen(Allergen::Wheat);
        assert_eq!(deck.view().ids(), vec![1]);

        deck.clear_allergens();
        assert_eq!(deck.view().len(), 4);
    }

    #[test]
    fn test_boundaries() {
        let mut deck = Deck::new(catalog());
        assert!(deck.is_at_start());
        assert_eq!(deck.prev(), TransitionIntent::None);

        for _ in 0..10 {
            deck.next();
        }
        assert!(deck.is_at_end());
        assert_eq!(deck.current().map(|i| i.id), Some(4));
    }

    #[test]
    fn test_transition_advances_presented_snapshot() {
        let mut deck = Deck::new(catalog());
        deck.next();
        assert_eq!(deck.transition(), TransitionIntent::None);
    }

    #[test]
    fn test_friends_overlap_through_deck() {
        let mut deck = Deck::new(catalog());
        deck.toggle_liked(4);
        deck.next();
        deck.scrap_current();

        let overlaps = deck.friends_overlap();
        assert_eq!(overlaps[0].item_ids, vec![2, 4]);
        assert_eq!(overlaps[0].item_names, vec!["Ramen", "Margherita"]);
    }
}
