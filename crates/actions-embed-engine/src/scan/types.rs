use serde::Serialize;

use crate::document::LineRange;

use super::kinds::{ActionRef, BlockScalarHeader};

/// A step header whose action reference matched the grammar's target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepFact {
    /// Line of the `uses:` key.
    pub line: usize,
    pub action: ActionRef,
}

/// Header line of the second-level mapping key (e.g. `with:`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NestedKeyFact {
    pub line: usize,
    pub key: String,
}

/// Why an embedded block received its language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum BlockClaim {
    /// The key name fixes the language.
    Key { key: String },
    /// A sibling declaration earlier in the step chose the language.
    Declaration {
        resolver: String,
        shell: String,
        line: usize,
    },
}

/// The language an embedded block is highlighted with, and its origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Embedding {
    pub language: String,
    pub claim: BlockClaim,
}

/// A block scalar whose body is source code in another language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbeddedBlock {
    pub header_line: usize,
    /// `None` when the block ends right after its header.
    pub body: Option<LineRange>,
    pub header: BlockScalarHeader,
    pub embedding: Embedding,
}

impl EmbeddedBlock {
    pub fn language(&self) -> &str {
        &self.embedding.language
    }

    pub fn first_body_line(&self) -> Option<usize> {
        self.body.map(|b| b.first)
    }

    pub fn last_body_line(&self) -> Option<usize> {
        self.body.map(|b| b.last)
    }

    /// TextMate content scope for the body, e.g. `meta.embedded.block.python`.
    pub fn scope(&self) -> String {
        format!("meta.embedded.block.{}", self.embedding.language)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum RegionRole {
    Header,
    EmbeddedBody,
}

/// A flattened line interval handed to the highlighting layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Region {
    pub role: RegionRole,
    pub lines: LineRange,
    /// Set for embedded bodies only.
    pub language: Option<String>,
}

/// All facts produced by one scan of one document with one grammar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    pub steps: Vec<StepFact>,
    pub nested_keys: Vec<NestedKeyFact>,
    pub blocks: Vec<EmbeddedBlock>,
}

impl ScanReport {
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty() && self.nested_keys.is_empty() && self.blocks.is_empty()
    }

    /// Header and body regions ordered by first line.
    pub fn regions(&self) -> Vec<Region> {
        let header = |line| Region {
            role: RegionRole::Header,
            lines: LineRange::single(line),
            language: None,
        };

        let mut out: Vec<Region> = self
            .steps
            .iter()
            .map(|s| header(s.line))
            .chain(self.nested_keys.iter().map(|n| header(n.line)))
            .collect();

        for block in &self.blocks {
            out.push(header(block.header_line));
            if let Some(body) = block.body {
                out.push(Region {
                    role: RegionRole::EmbeddedBody,
                    lines: body,
                    language: Some(block.embedding.language.clone()),
                });
            }
        }

        out.sort_by_key(|r| (r.lines.first, r.role));
        out
    }
}

/// A report tagged with the grammar that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GrammarReport {
    pub grammar: String,
    pub report: ScanReport,
}
