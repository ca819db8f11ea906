//! Bounded cursor into a filtered view

use serde::{Deserialize, Serialize};

/// Where the cursor points after the last clamp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CursorPosition {
    /// The view is empty; there is no current item
    Empty,
    /// Index of the current item within the view
    At(usize),
}

impl CursorPosition {
    pub fn index(&self) -> Option<usize> {
        match self {
            CursorPosition::Empty => None,
            CursorPosition::At(index) => Some(*index),
        }
    }
}

/// Validate `index` against a view of `len` items.
///
/// `None` when the view is empty; `Some(0)` when the index fell off the end;
/// the index unchanged otherwise.
pub fn clamp(len: usize, index: usize) -> Option<usize> {
    if len == 0 {
        None
    } else if index >= len {
        Some(0)
    } else {
        Some(index)
    }
}

/// Cursor over a view whose length it learns through [`NavigationCursor::clamp`].
///
/// Invariant after every clamp: `index < len` whenever `len > 0`. While the
/// view is empty the stored index is kept but not reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigationCursor {
    index: usize,
    len: usize,
}

impl NavigationCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-validate against a freshly computed view length
    pub fn clamp(&mut self, len: usize) -> CursorPosition {
        self.len = len;
        if let Some(index) = clamp(len, self.index) {
            self.index = index;
        }
        self.position()
    }

    pub fn position(&self) -> CursorPosition {
        if self.len == 0 {
            CursorPosition::Empty
        } else {
            CursorPosition::At(self.index)
        }
    }

    /// Raw index, meaningful only while the view is non-empty
    pub fn index(&self) -> usize {
        self.index
    }

    /// Length of the view at the last clamp
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Advance one item. Returns false (and does nothing) at the last item.
    pub fn step_next(&mut self) -> bool {
        if self.len > 0 && self.index < self.len - 1 {
            self.index += 1;
            true
        } else {
            false
        }
    }

    /// Go back one item. Returns false (and does nothing) at the first item.
    pub fn step_prev(&mut self) -> bool {
        if self.len > 0 && self.index > 0 {
            self.index -= 1;
            true
        } else {
            false
        }
    }

    /// Back to the first item
    pub fn reset(&mut self) {
        self.index = 0;
    }

    pub fn is_at_start(&self) -> bool {
        self.len == 0 || self.index == 0
    }

    pub fn is_at_end(&self) -> bool {
        self.len == 0 || self.index == self.len - 1
    }
}
