use std::sync::OnceLock;

use regex::Regex;

use crate::document::LineRef;

/// The `key: value` shape of a mapping line, split into the same four pieces
/// every matcher works with: indentation, key, separator and value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyLine<'a> {
    /// Leading whitespace before the key or list marker.
    pub indent: &'a str,
    /// Whether the key is preceded by a `- ` list marker.
    pub list_item: bool,
    /// Byte column where the key starts.
    pub key_column: usize,
    pub key: &'a str,
    /// The colon together with the whitespace around it.
    pub separator: &'a str,
    /// Everything after the separator, comments included.
    pub value: &'a str,
}

/// Classification of a single line containing only local facts.
///
/// Each line is classified independently; the builder decides what the
/// facts mean given the contexts open at that point.
#[derive(Debug, Clone)]
pub struct LineClass<'a> {
    /// 1-based line number.
    pub number: usize,
    pub text: &'a str,
    /// Leading spaces and tabs.
    pub indent: &'a str,
    /// Whether the line is empty or whitespace only.
    pub is_blank: bool,
    /// The key/value split, if the line looks like a mapping entry.
    pub key: Option<KeyLine<'a>>,
}

impl LineClass<'_> {
    /// Key line whose key equals `name`.
    pub fn key_named(&self, name: &str) -> Option<&KeyLine<'_>> {
        self.key.as_ref().filter(|k| k.key == name)
    }
}

/// Classifies individual lines for the scanning phase.
pub struct WorkflowLineClassifier;

impl WorkflowLineClassifier {
    pub fn classify<'a>(&self, lr: &LineRef<'a>) -> LineClass<'a> {
        let text = lr.text;
        let indent_len = text.len() - text.trim_start_matches([' ', '\t']).len();

        LineClass {
            number: lr.number,
            text,
            indent: &text[..indent_len],
            is_blank: text.trim().is_empty(),
            key: split_key_line(text),
        }
    }
}

fn key_line_regex() -> &'static Regex {
    static KEY_LINE: OnceLock<Regex> = OnceLock::new();
    KEY_LINE.get_or_init(|| {
        Regex::new(r"^([ \t]*)(-[ \t]+)?([A-Za-z0-9_][A-Za-z0-9_.-]*)([ \t]*:(?:[ \t]+|$))(.*)$")
            .expect("Invalid key line regex")
    })
}

fn split_key_line(text: &str) -> Option<KeyLine<'_>> {
    let caps = key_line_regex().captures(text)?;
    let indent = caps.get(1)?.as_str();
    let key = caps.get(3)?;
    Some(KeyLine {
        indent,
        list_item: caps.get(2).is_some(),
        key_column: key.start(),
        key: key.as_str(),
        separator: caps.get(4)?.as_str(),
        value: caps.get(5)?.as_str(),
    })
}
