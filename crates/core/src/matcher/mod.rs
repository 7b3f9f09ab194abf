//! Matching pipeline and its output types.

mod assemble;
mod engine;
mod types;

pub use assemble::assemble;
pub use engine::BrushMatcher;
pub use types::*;
