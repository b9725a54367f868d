use std::fmt;

use serde::Serialize;

use super::scalar::{QuoteStyle, read_scalar};

/// The value of a step's `uses:` key, e.g. `actions/github-script@v7`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionRef {
    pub identifier: String,
    /// Text after the first `@`; may itself contain `/`.
    pub git_ref: Option<String>,
    pub quote: QuoteStyle,
}

impl ActionRef {
    pub fn parse(value: &str) -> Option<Self> {
        let scalar = read_scalar(value)?;
        if scalar.text.chars().any(char::is_whitespace) {
            return None;
        }
        let (identifier, git_ref) = match scalar.text.split_once('@') {
            Some((id, r)) if !r.is_empty() => (id, Some(r.to_string())),
            Some(_) => return None,
            None => (scalar.text, None),
        };
        if identifier.is_empty() {
            return None;
        }
        Some(Self {
            identifier: identifier.to_string(),
            git_ref,
            quote: scalar.quote,
        })
    }

    /// True when this reference names `action`, whatever the ref.
    pub fn is(&self, action: &str) -> bool {
        self.identifier == action
    }
}

impl fmt::Display for ActionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.git_ref {
            Some(r) => write!(f, "{}@{}", self.identifier, r),
            None => f.write_str(&self.identifier),
        }
    }
}
