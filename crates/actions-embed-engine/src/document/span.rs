use serde::Serialize;

/// A byte range `[start, end)` into the document text.
///
/// Facts carry line numbers; spans are derived on demand so that a
/// highlighter can slice the original text without re-counting lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Span {
    /// Inclusive start byte offset.
    pub start: usize,
    /// Exclusive end byte offset.
    pub end: usize,
}

impl Span {
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
}

/// An inclusive range of 1-based line numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct LineRange {
    pub first: usize,
    pub last: usize,
}

impl LineRange {
    pub fn single(line: usize) -> Self {
        Self {
            first: line,
            last: line,
        }
    }

    /// Returns true if `line` falls inside the range.
    pub fn contains(self, line: usize) -> bool {
        self.first <= line && line <= self.last
    }

    pub fn overlaps(self, other: LineRange) -> bool {
        self.first <= other.last && other.first <= self.last
    }

    /// Number of lines covered.
    pub fn len(self) -> usize {
        (self.last + 1).saturating_sub(self.first)
    }

    pub fn is_empty(self) -> bool {
        self.len() == 0
    }
}
