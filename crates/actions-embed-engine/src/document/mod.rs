//! # Documents
//!
//! A [`Document`] is the immutable, fully loaded text of one workflow file
//! split into 1-based lines. `\r\n` and `\n` terminators are treated alike and
//! never appear in [`LineRef::text`].

pub mod span;

pub use span::{LineRange, Span};

/// A single line of the document with its byte span.
#[derive(Debug, Clone)]
pub struct LineRef<'a> {
    /// 1-based line number.
    pub number: usize,
    /// Byte span of the line content, excluding the terminator.
    pub span: Span,
    /// Line content without `\r` or `\n`.
    pub text: &'a str,
}

#[derive(Debug, Clone)]
pub struct Document {
    text: String,
    lines: Vec<Span>,
}

impl Document {
    /// Splits `text` into lines.
    ///
    /// A trailing newline yields a final empty line, so a document always has
    /// `count('\n') + 1` lines.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut lines = Vec::new();
        let mut offset = 0usize;
        for raw in text.split('\n') {
            let start = offset;
            offset += raw.len() + 1;
            let content = raw.strip_suffix('\r').unwrap_or(raw);
            lines.push(Span {
                start,
                end: start + content.len(),
            });
        }
        Self { text, lines }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of lines, including a trailing empty one.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns the text of line `number` (1-based).
    pub fn line(&self, number: usize) -> Option<&str> {
        let sp = self.line_span(number)?;
        Some(&self.text[sp.start..sp.end])
    }

    pub fn line_span(&self, number: usize) -> Option<Span> {
        number
            .checked_sub(1)
            .and_then(|idx| self.lines.get(idx))
            .copied()
    }

    /// Byte span from the start of `range.first` to the end of `range.last`.
    pub fn range_span(&self, range: LineRange) -> Option<Span> {
        let first = self.line_span(range.first)?;
        let last = self.line_span(range.last)?;
        Some(Span {
            start: first.start,
            end: last.end,
        })
    }

    pub fn lines(&self) -> impl Iterator<Item = LineRef<'_>> + '_ {
        self.lines.iter().enumerate().map(|(idx, &span)| LineRef {
            number: idx + 1,
            span,
            text: &self.text[span.start..span.end],
        })
    }
}

impl From<&str> for Document {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}
