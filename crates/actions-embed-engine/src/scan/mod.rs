//! # Region Scanning
//!
//! Single-pass, indentation-sensitive detection of embedded-language regions
//! in a workflow document.
//!
//! ## Phases
//!
//! 1. **Line Classification** (`classify`): each line is split into local
//!    facts (indentation, blank status, the `key: value` shape).
//!
//! 2. **Region Construction** (`builder`): a `RegionBuilder` keeps a stack of
//!    typed contexts (step, nested key, embedded block) and emits facts as
//!    contexts open and close.
//!
//! ## Modules
//!
//! - **`kinds`**: value shapes (block-scalar indicator, action reference,
//!   quoted scalar)
//! - **`context`**: context variants, their closing predicates, the stack
//! - **`resolver`**: shell declaration side table and per-language resolvers
//! - **`types`**: output facts (`ScanReport`, `EmbeddedBlock`, `Region`)
//!
//! ## Key Invariants
//!
//! - A context closes on the first non-blank line indented no deeper than its
//!   opening line, never on the opening line itself
//! - An open embedded block absorbs every line until it closes; its body is
//!   never inspected for headers or declarations
//! - Closing a context closes all of its children first
//! - Declarations are visible only to run blocks that follow them in the same
//!   step

pub mod builder;
pub mod classify;
pub mod context;
pub mod kinds;
pub mod resolver;
pub mod types;

#[cfg(test)]
mod tests;

pub use builder::RegionBuilder;
pub use classify::{KeyLine, LineClass, WorkflowLineClassifier};
pub use types::{
    BlockClaim, EmbeddedBlock, Embedding, GrammarReport, NestedKeyFact, Region, RegionRole,
    ScanReport, StepFact,
};

use crate::{document::Document, grammar::Grammar};

/// Scans `doc` once with `grammar`.
pub fn scan_document(doc: &Document, grammar: &Grammar) -> ScanReport {
    let classifier = WorkflowLineClassifier;
    let mut builder = RegionBuilder::new(grammar);

    for lr in doc.lines() {
        let lc = classifier.classify(&lr);
        builder.push(&lc);
    }

    builder.finish()
}

/// Runs an independent scan per grammar.
pub fn scan_all(doc: &Document, grammars: &[Grammar]) -> Vec<GrammarReport> {
    grammars
        .iter()
        .map(|grammar| GrammarReport {
            grammar: grammar.name.clone(),
            report: scan_document(doc, grammar),
        })
        .collect()
}
