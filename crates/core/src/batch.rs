//! Data-parallel matching of record sets.
//!
//! Records are matched on a dedicated rayon pool against one shared
//! snapshot. [`BatchRunner::match_by_month`] partitions by month and asks the
//! [`SnapshotManager`] for a snapshot per partition, which is where an
//! invalidation takes effect.

use std::collections::BTreeMap;
use std::time::Instant;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::matcher::{MatchResult, MatchType};
use crate::metrics;
use crate::snapshot::{Snapshot, SnapshotManager};

/// One brush mention to match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrushRecord {
    pub id: String,
    /// Partition key, e.g. "2025-05".
    pub month: String,
    pub brush: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedRecord {
    pub id: String,
    pub month: String,
    pub result: MatchResult,
}

/// Results for one month and the snapshot generation that produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthBatch {
    pub month: String,
    pub generation: u64,
    pub records: Vec<MatchedRecord>,
}

impl MonthBatch {
    pub fn count(&self, match_type: MatchType) -> usize {
        self.records
            .iter()
            .filter(|r| r.result.match_type == match_type)
            .count()
    }
}

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// Worker pool for batch matching.
#[derive(Debug)]
pub struct BatchRunner {
    pool: ThreadPool,
}

impl BatchRunner {
    /// Pool with `workers` threads; 0 means one per CPU.
    pub fn new(workers: usize) -> Result<Self, BatchError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("brushmatch-worker-{}", i))
            .build()?;
        Ok(Self { pool })
    }

    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Match `records` against `snapshot`. Output order equals input order.
    pub fn match_records(&self, snapshot: &Snapshot, records: &[BrushRecord]) -> Vec<MatchedRecord> {
        let started = Instant::now();
        let matched: Vec<MatchedRecord> = self.pool.install(|| {
            records
                .par_iter()
                .map(|record| MatchedRecord {
                    id: record.id.clone(),
                    month: record.month.clone(),
                    result: snapshot.match_brush(&record.brush),
                })
                .collect()
        });
        metrics::BATCH_DURATION
            .with_label_values(&[])
            .observe(started.elapsed().as_secs_f64());
        matched
    }

    /// Group by month (ascending) and match each month against the
    /// manager's snapshot at the time the month starts.
    pub fn match_by_month(&self, manager: &SnapshotManager, records: &[BrushRecord]) -> Vec<MonthBatch> {
        let mut months: BTreeMap<&str, Vec<BrushRecord>> = BTreeMap::new();
        for record in records {
            months
                .entry(record.month.as_str())
                .or_default()
                .push(record.clone());
        }

        months
            .into_iter()
            .map(|(month, records)| {
                let snapshot = manager.snapshot_for_batch();
                let matched = self.match_records(&snapshot, &records);
                let batch = MonthBatch {
                    month: month.to_string(),
                    generation: snapshot.generation(),
                    records: matched,
                };
                info!(
                    "Matched {} records for {} (generation {}): {} exact, {} strategy, {} unmatched",
                    batch.records.len(),
                    batch.month,
                    batch.generation,
                    batch.count(MatchType::Exact),
                    batch.count(MatchType::Strategy),
                    batch.count(MatchType::Unmatched)
                );
                batch
            })
            .collect()
    }
}
