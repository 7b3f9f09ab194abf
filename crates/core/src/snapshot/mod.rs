//! Immutable matching snapshots and their reload lifecycle.
//!
//! A [`Snapshot`] is everything one batch needs: compiled catalog,
//! correct-match store, strategy registries and split rules. The
//! [`SnapshotManager`] owns the current one and replaces it wholesale when
//! invalidated.

mod generation;
mod manager;
mod source;
mod types;

pub use generation::Snapshot;
pub use manager::SnapshotManager;
pub use source::{FileSnapshotSource, SnapshotSource, StaticSnapshotSource};
pub use types::{SnapshotError, SnapshotInputs, SnapshotSettings};
