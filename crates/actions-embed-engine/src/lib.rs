//! # actions-embed-engine
//!
//! Finds the parts of a GitHub Actions workflow that hold source code in
//! another language, so that an editor can highlight them with that
//! language's rules instead of YAML's.
//!
//! Two cases are covered:
//!
//! - `script:` bodies of `actions/github-script` steps (JavaScript)
//! - `run:` bodies whose language is named by an earlier `shell:` key in the
//!   same step
//!
//! ```
//! use actions_embed_engine::{Document, Grammar, scan_document};
//!
//! let doc = Document::new("steps:\n  - shell: bash\n    run: |\n      echo hi\n");
//! let report = scan_document(&doc, &Grammar::run_shell());
//! assert_eq!(report.blocks[0].language(), "shellscript");
//! ```

pub mod document;
pub mod grammar;
pub mod scan;
pub mod snapshot;

pub use document::{Document, LineRange, Span};
pub use grammar::{EmbedRule, Grammar, GrammarError, ShellLanguage};
pub use scan::kinds::IndentDigits;
pub use scan::{
    EmbeddedBlock, GrammarReport, Region, RegionRole, ScanReport, StepFact, scan_all,
    scan_document,
};
