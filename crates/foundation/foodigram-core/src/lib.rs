//! # Foodigram Core
//!
//! The data model every other foodigram crate speaks: food items, the fixed
//! category and allergen vocabularies, friends, and the [`Catalog`] that holds
//! them for the lifetime of a process.
//!
//! ```text
//! catalog.json ──> Catalog::load ──> validated, immutable Catalog
//!                      │
//!                      └── rejects unknown labels, empty names, duplicate ids
//! ```
//!
//! Nothing in this crate mutates after load. Filtering, cursors and interaction
//! state live in `foodigram-deck`.

pub mod catalog;
pub mod item;
pub mod social;

pub use catalog::Catalog;
pub use item::{Allergen, Category, ContentItem, ItemId};
pub use social::{FriendId, SocialEntry};

/// Result type for foodigram-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing labels or loading a catalog
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Unknown allergen: {0}")]
    UnknownAllergen(String),

    #[error("Malformed item {item_id}: {reason}")]
    MalformedItem { item_id: ItemId, reason: String },

    #[error("Malformed friend {friend_id}: {reason}")]
    MalformedFriend { friend_id: FriendId, reason: String },

    #[error("Duplicate item id: {0}")]
    DuplicateItem(ItemId),

    #[error("Duplicate friend id: {0}")]
    DuplicateFriend(FriendId),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
