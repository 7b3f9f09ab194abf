//! Product catalog: raw data shapes, attribute detection, and the compiled index.
//!
//! Catalog data arrives as parsed [`CatalogSources`] (one table per product
//! category) and is compiled once into a [`CatalogIndex`]. Every recognition
//! pattern is compiled at build time; a malformed pattern disqualifies only
//! its own entry and is reported as a [`PatternError`].

mod attributes;
mod error;
mod index;
mod loader;
mod types;

pub use attributes::{detect_fiber, fiber_token_offset, knot_size_offset, parse_knot_size};
pub use error::{CatalogError, PatternError};
pub use index::{
    CatalogBuild, CatalogEntry, CatalogIndex, CatalogStats, CompiledPattern, PatternSweep,
    SweepHit,
};
pub use loader::{load_catalog_sources, read_toml};
pub use types::*;
