//! # Snapshot Testing Support
//!
//! Utilities for testing the scanner via snapshot assertions and invariant
//! checks.
//!
//! ## Modules
//!
//! - **`normalize`**: Converts a `ScanReport` to a stable, serializable `Snap`
//!   format for `insta` snapshot testing
//! - **`invariants`**: Runtime checks for scanner correctness (lines in
//!   bounds, bodies directly after their headers, no header inside a body, no
//!   overlapping bodies)

pub mod invariants;
pub mod normalize;

pub use invariants::check as invariants;
pub use normalize::{Snap, normalize};
