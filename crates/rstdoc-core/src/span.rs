//! Source location tracking for document nodes.
//!
//! Every node produced by a production rule records the range of lines it
//! was built from. Line indices are positions of the line cursor, so they
//! count from zero over the trimmed (and possibly hook-rewritten) content.

/// A range of line indices in the parsed content.
///
/// The range is half-open: `[start, end)`.
///
/// # Example
///
/// ```rust
/// use rstdoc_core::span::Span;
///
/// let span = Span::new(2, 5);
/// assert_eq!(span.len(), 3);
/// assert!(span.contains(4));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Span {
    /// First line of the range (inclusive).
    pub start: usize,
    /// Line after the last line of the range (exclusive).
    pub end: usize,
}

impl Span {
    /// Create a new span from line indices.
    #[inline]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Span covering exactly one line.
    #[inline]
    pub const fn line(index: usize) -> Self {
        Self {
            start: index,
            end: index + 1,
        }
    }

    /// Span covering the lines `first..=last`.
    #[inline]
    pub const fn lines(first: usize, last: usize) -> Self {
        Self {
            start: first,
            end: last + 1,
        }
    }

    /// Number of lines covered.
    #[inline]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Check if this span covers no line at all.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Check if this span contains a line index.
    #[inline]
    pub const fn contains(&self, line: usize) -> bool {
        line >= self.start && line < self.end
    }

    /// The same range moved `offset` lines down.
    #[inline]
    pub const fn shifted(self, offset: usize) -> Self {
        Self {
            start: self.start + offset,
            end: self.end + offset,
        }
    }
}
