//! Byte ranges into mapping-file source.

use std::ops::Range;

/// Half-open byte range `[start, end)` of a token or syntax node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Smallest span containing both `self` and `other`.
    pub fn merge(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }

    /// Empty span just past the end, used for "expected X after Y" errors.
    pub fn end_point(self) -> Span {
        Span::new(self.end, self.end)
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Span::new(range.start, range.end)
    }
}

/// 1-based line and column (in characters) of a byte offset.
///
/// Offsets past the end of `source` resolve to the position after the last
/// character.
pub fn offset_to_line_col(source: &str, offset: usize) -> (usize, usize) {
    let before = source
        .char_indices()
        .take_while(|(idx, _)| *idx < offset)
        .map(|(_, ch)| ch);

    before.fold((1, 1), |(line, col), ch| match ch {
        '\n' => (line + 1, 1),
        _ => (line, col + 1),
    })
}
