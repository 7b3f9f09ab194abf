//! Prometheus metrics for the matching engine.
//!
//! This module provides metrics for:
//! - Match outcomes (match type, winning strategy, split decisions)
//! - Catalog and snapshot lifecycle (pattern errors, reloads)
//! - Batch throughput

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry};

// =============================================================================
// Matching
// =============================================================================

/// Match results by match type.
pub static MATCH_RESULTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("brushmatch_match_results_total", "Total match results"),
        &["match_type"], // "exact", "strategy", "unmatched"
    )
    .unwrap()
});

/// Winning strategy per component.
pub static STRATEGY_WINS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "brushmatch_strategy_wins_total",
            "Candidates selected by the scorer",
        ),
        &["component", "strategy"],
    )
    .unwrap()
});

/// Split resolver decisions.
pub static SPLIT_OUTCOMES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "brushmatch_split_outcomes_total",
            "Composite detection outcomes",
        ),
        &["outcome"], // "composite", "not_composite"
    )
    .unwrap()
});

// =============================================================================
// Catalog / Snapshot
// =============================================================================

/// Catalog entries skipped because a pattern did not compile.
pub static CATALOG_PATTERN_ERRORS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "brushmatch_catalog_pattern_errors_total",
        "Malformed catalog patterns seen while building snapshots",
    )
    .unwrap()
});

/// Snapshot rebuilds by result.
pub static SNAPSHOT_RELOADS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "brushmatch_snapshot_reloads_total",
            "Snapshot rebuilds",
        ),
        &["result"], // "success", "failure"
    )
    .unwrap()
});

// =============================================================================
// Batch
// =============================================================================

/// Batch duration in seconds.
pub static BATCH_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "brushmatch_batch_duration_seconds",
            "Duration of one batch partition",
        )
        .buckets(vec![0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 10.0, 30.0, 60.0]),
        &[],
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(MATCH_RESULTS.clone()),
        Box::new(STRATEGY_WINS.clone()),
        Box::new(SPLIT_OUTCOMES.clone()),
        Box::new(CATALOG_PATTERN_ERRORS.clone()),
        Box::new(SNAPSHOT_RELOADS.clone()),
        Box::new(BATCH_DURATION.clone()),
    ]
}

/// Register every metric in `registry`.
pub fn register_metrics(registry: &Registry) -> prometheus::Result<()> {
    for collector in all_metrics() {
        registry.register(collector)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_metrics_once_per_registry() {
        let registry = Registry::new();
        register_metrics(&registry).unwrap();
        // registering the same collectors twice is rejected
        assert!(register_metrics(&registry).is_err());

        MATCH_RESULTS.with_label_values(&["exact"]).inc();
        let names: Vec<_> = registry
            .gather()
            .into_iter()
            .map(|family| family.get_name().to_string())
            .collect();
        assert!(names.contains(&"brushmatch_match_results_total".to_string()));
    }
}
