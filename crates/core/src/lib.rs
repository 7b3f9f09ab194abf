pub mod batch;
pub mod catalog;
pub mod config;
pub mod matcher;
pub mod metrics;
pub mod normalize;
pub mod overrides;
pub mod snapshot;
pub mod split;
pub mod strategy;
pub mod testing;

pub use batch::{BatchError, BatchRunner, BrushRecord, MatchedRecord, MonthBatch};
pub use catalog::{
    CatalogError, CatalogIndex, CatalogSources, Fiber, PatternError, ProductIdentity,
};
pub use config::{
    load_config, load_config_from_str, validate_config, CatalogConfig, Config, ConfigError,
    MatchingConfig,
};
pub use matcher::{
    BrushMatcher, ComponentMatch, CompositeMatch, MatchResult, MatchType, Matched, UserIntent,
};
pub use normalize::normalize;
pub use overrides::{CorrectMatchFile, CorrectMatchStore, OverrideError, OverrideKind};
pub use snapshot::{
    FileSnapshotSource, Snapshot, SnapshotError, SnapshotInputs, SnapshotManager,
    SnapshotSettings, SnapshotSource, StaticSnapshotSource,
};
pub use split::{SplitOutcome, SplitResolver, SplitRules};
pub use strategy::{Component, Registries, Strategy, StrategyRegistry};
