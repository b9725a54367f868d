use serde::Serialize;

use crate::scan::{BlockClaim, ScanReport};

#[derive(Serialize)]
pub struct Snap {
    pub grammar: String,
    pub steps: Vec<StepSnap>,
    pub nested_keys: Vec<usize>,
    pub blocks: Vec<BlockSnap>,
}

#[derive(Serialize)]
pub struct StepSnap {
    pub line: usize,
    pub action: String,
}

#[derive(Serialize)]
pub struct BlockSnap {
    pub header: usize,
    pub first_body: Option<usize>,
    pub last_body: Option<usize>,
    pub language: String,
    /// Key name for fixed-key blocks, resolver name for declared ones.
    pub claimed_by: String,
}

pub fn normalize(grammar: &str, report: &ScanReport) -> Snap {
    let steps = report
        .steps
        .iter()
        .map(|s| StepSnap {
            line: s.line,
            action: s.action.to_string(),
        })
        .collect();

    let blocks = report
        .blocks
        .iter()
        .map(|b| BlockSnap {
            header: b.header_line,
            first_body: b.first_body_line(),
            last_body: b.last_body_line(),
            language: b.language().to_string(),
            claimed_by: match &b.embedding.claim {
                BlockClaim::Key { key } => key.clone(),
                BlockClaim::Declaration { resolver, .. } => resolver.clone(),
            },
        })
        .collect();

    Snap {
        grammar: grammar.to_string(),
        steps,
        nested_keys: report.nested_keys.iter().map(|n| n.line).collect(),
        blocks,
    }
}
