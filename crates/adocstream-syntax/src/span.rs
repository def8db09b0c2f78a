/// A byte range `[start, end)` into the source text.
///
/// Tokens, codes and text ops store spans rather than copied text; the
/// driver slices the source only when it hands leaf text to a visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Span {
    /// Inclusive start byte offset.
    pub start: usize,
    /// Exclusive end byte offset.
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the length in bytes. Uses saturating subtraction for safety.
    #[must_use]
    pub fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true if the span is empty (start >= end).
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// Slices `source` with this span.
    ///
    /// Returns an empty string when the span does not fall on character
    /// boundaries inside `source`, so a span taken from a different text
    /// never panics.
    #[must_use]
    pub fn text(self, source: &str) -> &str {
        source.get(self.start..self.end).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn len_and_is_empty() {
        assert_eq!(Span::new(2, 5).len(), 3);
        assert!(Span::new(4, 4).is_empty());
        assert!(Span::new(5, 4).is_empty());
    }

    #[test]
    fn text_slices_source() {
        assert_eq!(Span::new(2, 7).text("= Title\n"), "Title");
    }

    #[test]
    fn text_out_of_bounds_is_empty() {
        assert_eq!(Span::new(3, 10).text("abc"), "");
    }
}
