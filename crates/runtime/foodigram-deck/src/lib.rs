//! # Foodigram Deck
//!
//! The engine behind the swipe deck, as one pull-based pipeline:
//!
//! ```text
//! ┌─────────┐   ┌──────────────┐   ┌───────────────┐   ┌─────────────┐
//! │ Catalog │──>│ FilterEngine │──>│ FilteredView  │──>│   Cursor    │──> current item
//! └─────────┘   └──────────────┘   └───────────────┘   └─────────────┘
//!                 ▲          ▲                               │
//!          FilterCriteria  liked ids               TransitionResolver
//!                            │                               │
//!                     InteractionStore              forward / backward /
//!                     (liked, scrapped)              replace / none
//! ```
//!
//! Any mutation (a predicate, a toggle, a cursor step) triggers a fresh pass.
//! There is no incremental update and no subscriber machinery: consumers read
//! the [`Deck`] after each call.
//!
//! The pieces are usable on their own. [`filter`], [`resolve`] and
//! [`cursor::clamp`] are pure functions; [`Deck`] wires them together.

pub mod criteria;
pub mod cursor;
pub mod deck;
pub mod filter;
pub mod history;
pub mod interactions;
pub mod social;
pub mod transition;

pub use criteria::FilterCriteria;
pub use cursor::{CursorPosition, NavigationCursor};
pub use deck::Deck;
pub use filter::{filter, FilteredView};
pub use history::{export_markdown, HistoryRecord, HistorySync, HISTORY_VERSION};
pub use interactions::{InteractionStore, ScrappedEntry};
pub use social::{friends_overlap, mutual_interactions, FriendOverlap};
pub use transition::{resolve, TransitionIntent, TransitionSnapshot};

/// Result type for foodigram-deck operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors from the persistence sync step. The engine itself never fails.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(#[from] foodigram_storage::Error),

    #[error("Unsupported history version: {0}")]
    UnsupportedVersion(u32),
}
