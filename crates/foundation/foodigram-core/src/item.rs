//! Food item definitions and the fixed category/allergen vocabularies

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Identifier of a [`ContentItem`], unique within a catalog
pub type ItemId = u32;

/// Menu type of a food item
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Korean,
    Japanese,
    Chinese,
    Western,
    #[serde(rename = "snack food")]
    SnackFood,
    Burger,
    Pizza,
    Chicken,
}

impl Category {
    /// Every known category, in menu order
    pub const ALL: [Category; 8] = [
        Category::Korean,
        Category::Japanese,
        Category::Chinese,
        Category::Western,
        Category::SnackFood,
        Category::Burger,
        Category::Pizza,
        Category::Chicken,
    ];

    /// Wire label, as it appears in catalog files
    pub fn label(&self) -> &'static str {
        match self {
            Category::Korean => "korean",
            Category::Japanese => "japanese",
            Category::Chinese => "chinese",
            Category::Western => "western",
            Category::SnackFood => "snack food",
            Category::Burger => "burger",
            Category::Pizza => "pizza",
            Category::Chicken => "chicken",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_label(s);
        Category::ALL
            .into_iter()
            .find(|c| c.label() == wanted)
            .ok_or_else(|| Error::UnknownCategory(s.to_string()))
    }
}

/// Allergen an item may contain
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Allergen {
    Milk,
    Eggs,
    Peanuts,
    Soy,
    Wheat,
    Fish,
    Shellfish,
    Sesame,
    #[serde(rename = "tree nuts")]
    TreeNuts,
}

impl Allergen {
    /// Every known allergen, in filter-sheet order
    pub const ALL: [Allergen; 9] = [
        Allergen::Milk,
        Allergen::Eggs,
        Allergen::Peanuts,
        Allergen::Soy,
        Allergen::Wheat,
        Allergen::Fish,
        Allergen::Shellfish,
        Allergen::Sesame,
        Allergen::TreeNuts,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Allergen::Milk => "milk",
            Allergen::Eggs => "eggs",
            Allergen::Peanuts => "peanuts",
            Allergen::Soy => "soy",
            Allergen::Wheat => "wheat",
            Allergen::Fish => "fish",
            Allergen::Shellfish => "shellfish",
            Allergen::Sesame => "sesame",
            Allergen::TreeNuts => "tree nuts",
        }
    }
}

impl fmt::Display for Allergen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Allergen {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_label(s);
        Allergen::ALL
            .into_iter()
            .find(|a| a.label() == wanted)
            .ok_or_else(|| Error::UnknownAllergen(s.to_string()))
    }
}

/// Lowercase, trim, and accept `-`/`_` in place of the single space
fn normalize_label(s: &str) -> String {
    s.trim().to_lowercase().replace(['-', '_'], " ")
}

/// A single food card in the deck
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    /// Unique identifier
    pub id: ItemId,

    /// Display name
    pub name: String,

    /// Human-readable distance, e.g. "0.3 km"
    #[serde(rename = "distance")]
    pub distance_label: String,

    /// Image URL or asset reference
    #[serde(rename = "image")]
    pub image_ref: String,

    /// Extra search terms
    #[serde(default)]
    pub keywords: Vec<String>,

    pub category: Category,

    #[serde(default)]
    pub allergens: BTreeSet<Allergen>,
}

impl ContentItem {
    pub fn new(id: ItemId, name: impl Into<String>, category: Category) -> Self {
        Self {
            id,
            name: name.into(),
            distance_label: String::new(),
            image_ref: String::new(),
            keywords: Vec::new(),
            category,
            allergens: BTreeSet::new(),
        }
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_allergens(mut self, allergens: impl IntoIterator<Item = Allergen>) -> Self {
        self.allergens = allergens.into_iter().collect();
        self
    }

    pub fn with_distance(mut self, distance: impl Into<String>) -> Self {
        self.distance_label = distance.into();
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image_ref = image.into();
        self
    }

    /// Case-insensitive substring match against the name or any keyword.
    ///
    /// `needle` must already be lowercased.
    pub fn matches_text(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self
                .keywords
                .iter()
                .any(|k| k.to_lowercase().contains(needle))
    }

    /// True if this item contains any of the given allergens
    pub fn contains_any(&self, allergens: &BTreeSet<Allergen>) -> bool {
        !self.allergens.is_disjoint(allergens)
    }

    /// Render as a compact one-line string
    pub fn render_compact(&self) -> String {
        let mut line = format!("#{} {} [{}]", self.id, self.name, self.category);
        if !self.distance_label.is_empty() {
            line.push_str(&format!(" {}", self.distance_label));
        }
        if !self.allergens.is_empty() {
            let labels: Vec<_> = self.allergens.iter().map(Allergen::label).collect();
            line.push_str(&format!(" (contains: {})", labels.join(", ")));
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_labels_roundtrip() {
        for category in Category::ALL {
            assert_eq!(category.label().parse::<Category>().unwrap(), category);
        }
        assert_eq!("Snack-Food".parse::<Category>().unwrap(), Category::SnackFood);
        assert!("sushi".parse::<Category>().is_err());
    }

    #[test]
    fn test_allergen_serde_labels() {
        let json = serde_json::to_string(&Allergen::TreeNuts).unwrap();
        assert_eq!(json, "\"tree nuts\"");

        let parsed: Allergen = serde_json::from_str("\"shellfish\"").unwrap();
        assert_eq!(parsed, Allergen::Shellfish);
    }

    #[test]
    fn test_matches_text() {
        let item = ContentItem::new(1, "Bibimbap", Category::Korean)
            .with_keywords(["Rice", "spicy"]);

        assert!(item.matches_text("bibim"));
        assert!(item.matches_text("rice"));
        assert!(!item.matches_text("noodle"));
    }

    #[test]
    fn test_contains_any() {
        let item = ContentItem::new(1, "Ramen", Category::Japanese)
            .with_allergens([Allergen::Wheat, Allergen::Eggs]);

        let denied: BTreeSet<_> = [Allergen::Eggs].into();
        assert!(item.contains_any(&denied));
        assert!(!item.contains_any(&BTreeSet::new()));
    }

    #[test]
    fn test_item_wire_field_names() {
        let item = ContentItem::new(7, "Pizza", Category::Pizza)
            .with_distance("1.2 km")
            .with_image("pizza.png");
        let value = serde_json::to_value(&item).unwrap();

        assert_eq!(value["distance"], "1.2 km");
        assert_eq!(value["image"], "pizza.png");
        assert_eq!(value["category"], "pizza");
    }
}
