//! Value shapes recognised on individual lines.

pub mod action_ref;
pub mod block_scalar;
pub mod scalar;

pub use action_ref::ActionRef;
pub use block_scalar::{BlockScalarHeader, Chomping, IndentDigits, ScalarStyle};
pub use scalar::{QuoteStyle, ScalarValue, read_scalar};
