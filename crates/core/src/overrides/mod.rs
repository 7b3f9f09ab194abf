//! Correct-match store: human-confirmed results that take precedence over
//! every strategy.
//!
//! Keys are always produced by [`crate::normalize::normalize`]. Complete,
//! handle, and knot overrides live in separate partitions, so the same text
//! can be confirmed once as a whole brush and once as a handle or knot.

mod store;
mod types;

pub use store::{CorrectMatchStore, CorrectMatchStoreBuilder};
pub use types::{
    CorrectMatchFile, OverrideCanonical, OverrideEntry, OverrideError, OverrideKind, RawOverride,
};
