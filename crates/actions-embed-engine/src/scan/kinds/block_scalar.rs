use serde::{Deserialize, Serialize};

/// How many digits an explicit indentation indicator may have.
///
/// YAML itself allows a single digit, which is what the presets use. A
/// grammar may opt into `Multi`, which accepts any number without a leading
/// zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndentDigits {
    #[default]
    Single,
    Multi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScalarStyle {
    /// `|`
    Literal,
    /// `>`
    Folded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Chomping {
    Clip,
    /// `-`
    Strip,
    /// `+`
    Keep,
}

/// A parsed block-scalar indicator such as `|`, `>-` or `|2+`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlockScalarHeader {
    pub style: ScalarStyle,
    pub chomping: Chomping,
    pub indent: Option<u32>,
}

impl BlockScalarHeader {
    /// Parses the whole value of a `key: value` line as a block-scalar
    /// indicator. Trailing whitespace is allowed; anything else is rejected.
    pub fn parse(value: &str, digits: IndentDigits) -> Option<Self> {
        let mut chars = value.trim_end().chars().peekable();
        let style = match chars.next()? {
            '|' => ScalarStyle::Literal,
            '>' => ScalarStyle::Folded,
            _ => return None,
        };

        let mut chomping = None;
        let mut indent = None;

        // Chomping and indentation indicators may come in either order, each
        // at most once.
        while let Some(c) = chars.next() {
            match c {
                '-' | '+' => {
                    if chomping.is_some() {
                        return None;
                    }
                    chomping = Some(if c == '-' {
                        Chomping::Strip
                    } else {
                        Chomping::Keep
                    });
                }
                '1'..='9' => {
                    if indent.is_some() {
                        return None;
                    }
                    let mut n = c.to_digit(10)?;
                    while let Some(d) = chars.peek().and_then(|p| p.to_digit(10)) {
                        if digits == IndentDigits::Single {
                            return None;
                        }
                        n = n.checked_mul(10)?.checked_add(d)?;
                        chars.next();
                    }
                    indent = Some(n);
                }
                _ => return None,
            }
        }

        Some(Self {
            style,
            chomping: chomping.unwrap_or(Chomping::Clip),
            indent,
        })
    }
}
