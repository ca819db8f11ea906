//! The immutable catalog of items and friends
//!
//! Loaded once at startup from a JSON document of the form
//! `{ "items": [...], "friends": [...] }`. Every entry is validated at load
//! time so nothing downstream has to second-guess the data.

use serde::Deserialize;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use crate::{Allergen, Category, ContentItem, Error, ItemId, Result, SocialEntry};

/// Item entry as it appears on disk, before label validation
#[derive(Debug, Deserialize)]
struct RawItem {
    id: ItemId,
    name: String,
    #[serde(default)]
    distance: String,
    #[serde(default)]
    image: String,
    #[serde(default)]
    keywords: Vec<String>,
    category: String,
    #[serde(default)]
    allergens: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawCatalog {
    items: Vec<RawItem>,
    #[serde(default)]
    friends: Vec<SocialEntry>,
}

impl TryFrom<RawItem> for ContentItem {
    type Error = Error;

    fn try_from(raw: RawItem) -> Result<Self> {
        let malformed = |reason: String| Error::MalformedItem {
            item_id: raw.id,
            reason,
        };

        if raw.name.trim().is_empty() {
            return Err(malformed("empty name".to_string()));
        }

        let category: Category = raw
            .category
            .parse()
            .map_err(|e: Error| malformed(e.to_string()))?;

        let allergens = raw
            .allergens
            .iter()
            .map(|a| a.parse::<Allergen>())
            .collect::<Result<BTreeSet<_>>>()
            .map_err(|e| malformed(e.to_string()))?;

        Ok(ContentItem {
            id: raw.id,
            name: raw.name,
            distance_label: raw.distance,
            image_ref: raw.image,
            keywords: raw.keywords,
            category,
            allergens,
        })
    }
}

/// Ordered, read-only collection of items and friends.
///
/// Cloning is cheap: the contents are shared.
#[derive(Debug, Clone)]
pub struct Catalog {
    items: Arc<[ContentItem]>,
    friends: Arc<[SocialEntry]>,
    positions: Arc<HashMap<ItemId, usize>>,
}

impl Catalog {
    /// Build a catalog from already-typed entries, rejecting duplicates
    pub fn new(items: Vec<ContentItem>, friends: Vec<SocialEntry>) -> Result<Self> {
        let mut positions = HashMap::with_capacity(items.len());
        for (pos, item) in items.iter().enumerate() {
            if item.name.trim().is_empty() {
                return Err(Error::MalformedItem {
                    item_id: item.id,
                    reason: "empty name".to_string(),
                });
            }
            if positions.insert(item.id, pos).is_some() {
                return Err(Error::DuplicateItem(item.id));
            }
        }

        let mut friend_ids = HashSet::with_capacity(friends.len());
        for friend in &friends {
            if friend.name.trim().is_empty() {
                return Err(Error::MalformedFriend {
                    friend_id: friend.id,
                    reason: "empty name".to_string(),
                });
            }
            if !friend_ids.insert(friend.id) {
                return Err(Error::DuplicateFriend(friend.id));
            }
        }

        Ok(Self {
            items: items.into(),
            friends: friends.into(),
            positions: Arc::new(positions),
        })
    }

    /// Parse and validate a catalog document
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawCatalog = serde_json::from_str(json)?;
        let items = raw
            .items
            .into_iter()
            .map(ContentItem::try_from)
            .collect::<Result<Vec<_>>>()?;

        let catalog = Self::new(items, raw.friends)?;
        debug!(
            items = catalog.len(),
            friends = catalog.friends().len(),
            "parsed catalog"
        );
        Ok(catalog)
    }

    /// Load a catalog from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&content)?;
        info!(path = %path.display(), items = catalog.len(), "catalog loaded");
        Ok(catalog)
    }

    /// All items in catalog order
    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    /// All friends in catalog order
    pub fn friends(&self) -> &[SocialEntry] {
        &self.friends
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Item at a catalog position
    pub fn at(&self, position: usize) -> Option<&ContentItem> {
        self.items.get(position)
    }

    /// Look up an item by id
    pub fn get(&self, id: ItemId) -> Option<&ContentItem> {
        self.positions.get(&id).map(|&pos| &self.items[pos])
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.positions.contains_key(&id)
    }
}
