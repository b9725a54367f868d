use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum QuoteStyle {
    Plain,
    Single,
    Double,
}

/// A single-line flow scalar with its quotes and trailing comment removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScalarValue<'a> {
    /// Text between the quotes, or the plain text without the comment.
    pub text: &'a str,
    pub quote: QuoteStyle,
}

/// Reads the value part of a `key: value` line.
///
/// Returns `None` for an empty value, an unterminated quote, or anything
/// other than a comment after a closing quote.
pub fn read_scalar(value: &str) -> Option<ScalarValue<'_>> {
    let value = value.trim();
    if let Some(rest) = value.strip_prefix('\'') {
        let end = single_quote_end(rest)?;
        return quoted(rest, end, QuoteStyle::Single);
    }
    if let Some(rest) = value.strip_prefix('"') {
        let end = double_quote_end(rest)?;
        return quoted(rest, end, QuoteStyle::Double);
    }

    let text = strip_comment(value).trim_end();
    if text.is_empty() {
        return None;
    }
    Some(ScalarValue {
        text,
        quote: QuoteStyle::Plain,
    })
}

/// Drops a `# comment`. In YAML a `#` only starts a comment at the start of
/// the value or after whitespace.
pub fn strip_comment(value: &str) -> &str {
    if value.starts_with('#') {
        return "";
    }
    let bytes = value.as_bytes();
    for (idx, &b) in bytes.iter().enumerate().skip(1) {
        if b == b'#' && bytes[idx - 1].is_ascii_whitespace() {
            return &value[..idx];
        }
    }
    value
}

fn quoted(rest: &str, end: usize, quote: QuoteStyle) -> Option<ScalarValue<'_>> {
    let after = &rest[end + 1..];
    if !strip_comment(after).trim().is_empty() {
        return None;
    }
    // `'a'# x` is not a comment: the `#` must follow whitespace.
    if after.starts_with('#') {
        return None;
    }
    Some(ScalarValue {
        text: &rest[..end],
        quote,
    })
}

/// Index of the closing `'`, skipping `''` escapes.
fn single_quote_end(rest: &str) -> Option<usize> {
    let bytes = rest.as_bytes();
    let mut idx = 0;
    while idx < bytes.len() {
        if bytes[idx] == b'\'' {
            if bytes.get(idx + 1) == Some(&b'\'') {
                idx += 2;
                continue;
            }
            return Some(idx);
        }
        idx += 1;
    }
    None
}

/// Index of the closing `"`, skipping backslash escapes.
fn double_quote_end(rest: &str) -> Option<usize> {
    let bytes = rest.as_bytes();
    let mut idx = 0;
    while idx < bytes.len() {
        match bytes[idx] {
            b'\\' => idx += 2,
            b'"' => return Some(idx),
            _ => idx += 1,
        }
    }
    None
}
