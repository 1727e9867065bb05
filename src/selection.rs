//! Highlighted span of the display string.

/// A selection over the rendered value, in character offsets.
///
/// The range is always normalized such that `start <= end`. An empty range
/// is a collapsed caret.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SelectionRange {
    /// Start offset of the selection (inclusive).
    pub start: usize,
    /// End offset of the selection (exclusive).
    pub end: usize,
}

impl SelectionRange {
    /// Create a new selection range.
    ///
    /// The range is automatically normalized so `start <= end`.
    #[inline]
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// A collapsed caret at `pos`.
    #[inline]
    pub const fn caret(pos: usize) -> Self {
        Self { start: pos, end: pos }
    }

    /// Returns `true` if the selection is empty (zero-width).
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns the length of the selection in characters.
    #[inline]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns the selected characters of `value`.
    ///
    /// Offsets past the end of `value` select nothing.
    pub fn slice(&self, value: &str) -> String {
        value.chars().skip(self.start).take(self.len()).collect()
    }
}
