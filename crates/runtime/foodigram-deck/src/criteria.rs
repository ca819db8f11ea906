//! Filter criteria and their per-dimension predicates

use foodigram_core::{Allergen, Category, ContentItem, ItemId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The user's active predicates.
///
/// Each field is evaluated on its own and the results are ANDed together.
/// An empty `allowed_categories` set admits nothing; the default seeds every
/// known category so a fresh session shows the whole catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    pub search_text: String,
    pub allowed_categories: BTreeSet<Category>,
    pub denied_allergens: BTreeSet<Allergen>,
    pub liked_only: bool,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            allowed_categories: Category::ALL.into_iter().collect(),
            denied_allergens: BTreeSet::new(),
            liked_only: false,
        }
    }
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    // ============== Predicates ==============

    /// Lowercased, trimmed needle; `None` when the search admits everything
    pub fn search_needle(&self) -> Option<String> {
        let trimmed = self.search_text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_lowercase())
        }
    }

    pub fn passes_search(&self, item: &ContentItem) -> bool {
        match self.search_needle() {
            Some(needle) => item.matches_text(&needle),
            None => true,
        }
    }

    pub fn passes_category(&self, item: &ContentItem) -> bool {
        self.allowed_categories.contains(&item.category)
    }

    pub fn passes_allergens(&self, item: &ContentItem) -> bool {
        !item.contains_any(&self.denied_allergens)
    }

    pub fn passes_liked(&self, item: &ContentItem, liked: &BTreeSet<ItemId>) -> bool {
        !self.liked_only || liked.contains(&item.id)
    }

    /// All four predicates at once
    pub fn admits(&self, item: &ContentItem, liked: &BTreeSet<ItemId>) -> bool {
        self.passes_search(item)
            && self.passes_category(item)
            && self.passes_allergens(item)
            && self.passes_liked(item, liked)
    }

    // ============== Mutators ==============

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
    }

    pub fn clear_search(&mut self) {
        self.search_text.clear();
    }

    /// Flip a category in or out of the allow-list; returns the new membership
    pub fn toggle_category(&mut self, category: Category) -> bool {
        if self.allowed_categories.remove(&category) {
            false
        } else {
            self.allowed_categories.insert(category);
            true
        }
    }

    pub fn select_all_categories(&mut self) {
        self.allowed_categories = Category::ALL.into_iter().collect();
    }

    /// Empty the allow-list. The resulting view is empty until a category is
    /// selected again.
    pub fn clear_categories(&mut self) {
        self.allowed_categories.clear();
    }

    /// Flip an allergen in or out of the deny-list; returns the new membership
    pub fn toggle_allergen(&mut self, allergen: Allergen) -> bool {
        if self.denied_allergens.remove(&allergen) {
            false
        } else {
            self.denied_allergens.insert(allergen);
            true
        }
    }

    pub fn clear_allergens(&mut self) {
        self.denied_allergens.clear();
    }

    pub fn set_liked_only(&mut self, liked_only: bool) {
        self.liked_only = liked_only;
    }

    pub fn toggle_liked_only(&mut self) -> bool {
        self.liked_only = !self.liked_only;
        self.liked_only
    }

    /// True when no predicate narrows the catalog
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}
