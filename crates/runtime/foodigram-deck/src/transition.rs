//! Swipe direction derived from two deck snapshots

use serde::{Deserialize, Serialize};

/// The part of deck state a transition depends on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionSnapshot {
    pub cursor_index: usize,
    pub liked_only: bool,
}

/// Which presentation transition to play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionIntent {
    /// Moved to a later card (swipe left)
    Forward,
    /// Moved to an earlier card (swipe right)
    Backward,
    /// The whole deck was swapped (liked-only toggled)
    Replace,
    None,
}

impl TransitionIntent {
    pub fn label(&self) -> &'static str {
        match self {
            TransitionIntent::Forward => "forward",
            TransitionIntent::Backward => "backward",
            TransitionIntent::Replace => "replace",
            TransitionIntent::None => "none",
        }
    }
}

/// Compare two snapshots. A liked-only change wins over any index change.
pub fn resolve(previous: TransitionSnapshot, current: TransitionSnapshot) -> TransitionIntent {
    if previous.liked_only != current.liked_only {
        return TransitionIntent::Replace;
    }

    match current.cursor_index.cmp(&previous.cursor_index) {
        std::cmp::Ordering::Greater => TransitionIntent::Forward,
        std::cmp::Ordering::Less => TransitionIntent::Backward,
        std::cmp::Ordering::Equal => TransitionIntent::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(cursor_index: usize, liked_only: bool) -> TransitionSnapshot {
        TransitionSnapshot {
            cursor_index,
            liked_only,
        }
    }

    #[test]
    fn test_forward_then_replace() {
        assert_eq!(resolve(snap(0, false), snap(1, false)), TransitionIntent::Forward);
        assert_eq!(resolve(snap(0, false), snap(1, true)), TransitionIntent::Replace);
    }

    #[test]
    fn test_backward_and_none() {
        assert_eq!(resolve(snap(3, true), snap(2, true)), TransitionIntent::Backward);
        assert_eq!(resolve(snap(2, false), snap(2, false)), TransitionIntent::None);
    }

    #[test]
    fn test_replace_ignores_index() {
        assert_eq!(resolve(snap(4, true), snap(4, false)), TransitionIntent::Replace);
        assert_eq!(resolve(snap(4, true), snap(0, false)), TransitionIntent::Replace);
    }
}
