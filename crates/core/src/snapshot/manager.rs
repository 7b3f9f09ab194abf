//! Copy-and-swap ownership of the current snapshot.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use tracing::{info, warn};

use super::generation::Snapshot;
use super::source::SnapshotSource;
use super::types::{SnapshotError, SnapshotSettings};
use crate::metrics;

/// Holds the snapshot workers match against.
///
/// Readers clone the current `Arc` and keep it for as long as they need;
/// a reload builds a complete new snapshot and replaces the pointer, so a
/// reader never sees a partially built one.
pub struct SnapshotManager {
    source: Box<dyn SnapshotSource>,
    settings: SnapshotSettings,
    current: RwLock<Arc<Snapshot>>,
    stale: AtomicBool,
    next_generation: AtomicU64,
    reload_lock: Mutex<()>,
}

impl SnapshotManager {
    /// Build the first snapshot (generation 1).
    pub fn new<S>(source: S, settings: SnapshotSettings) -> Result<Self, SnapshotError>
    where
        S: SnapshotSource + 'static,
    {
        let inputs = source.load()?;
        let snapshot = Snapshot::build(&inputs, &settings, 1)?;
        info!("Loaded snapshot from {}", source.describe());

        Ok(Self {
            source: Box::new(source),
            settings,
            current: RwLock::new(Arc::new(snapshot)),
            stale: AtomicBool::new(false),
            next_generation: AtomicU64::new(2),
            reload_lock: Mutex::new(()),
        })
    }

    /// The snapshot in effect right now.
    pub fn current(&self) -> Arc<Snapshot> {
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&*guard)
    }

    /// Mark the current snapshot stale; the next batch rebuilds it.
    pub fn invalidate(&self) {
        info!("Snapshot invalidated");
        self.stale.store(true, Ordering::SeqCst);
    }

    pub fn is_stale(&self) -> bool {
        self.stale.load(Ordering::SeqCst)
    }

    /// Snapshot to run a batch against, rebuilding first if invalidated.
    ///
    /// A failed rebuild keeps serving the previous snapshot and leaves the
    /// stale flag set so the next batch retries.
    pub fn snapshot_for_batch(&self) -> Arc<Snapshot> {
        if self.is_stale() {
            if let Err(e) = self.reload() {
                warn!(
                    "Snapshot reload failed, keeping generation {}: {}",
                    self.current().generation(),
                    e
                );
            }
        }
        self.current()
    }

    /// Rebuild from the source now and swap it in.
    pub fn reload(&self) -> Result<Arc<Snapshot>, SnapshotError> {
        let _guard = self.reload_lock.lock().unwrap_or_else(|e| e.into_inner());
        self.stale.store(false, Ordering::SeqCst);

        let generation = self.next_generation.fetch_add(1, Ordering::SeqCst);
        let built = self
            .source
            .load()
            .and_then(|inputs| Snapshot::build(&inputs, &self.settings, generation));

        match built {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                {
                    let mut current = self.current.write().unwrap_or_else(|e| e.into_inner());
                    *current = Arc::clone(&snapshot);
                }
                metrics::SNAPSHOT_RELOADS.with_label_values(&["success"]).inc();
                info!(
                    "Swapped in snapshot generation {} ({})",
                    generation,
                    snapshot.fingerprint()
                );
                Ok(snapshot)
            }
            Err(e) => {
                metrics::SNAPSHOT_RELOADS.with_label_values(&["failure"]).inc();
                self.stale.store(true, Ordering::SeqCst);
                Err(e)
            }
        }
    }
}

impl std::fmt::Debug for SnapshotManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotManager")
            .field("source", &self.source.describe())
            .field("generation", &self.current().generation())
            .field("stale", &self.is_stale())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::MatchType;
    use crate::snapshot::StaticSnapshotSource;
    use crate::testing::fixtures;

    fn manager() -> (Arc<StaticSnapshotSource>, SnapshotManager) {
        let source = Arc::new(StaticSnapshotSource::new(fixtures::snapshot_inputs()));
        let manager =
            SnapshotManager::new(Arc::clone(&source), SnapshotSettings::default()).unwrap();
        (source, manager)
    }

    #[test]
    fn test_current_is_shared_until_reload() {
        let (_, manager) = manager();
        let a = manager.current();
        let b = manager.current();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.generation(), 1);
        assert!(!manager.is_stale());

        let reloaded = manager.reload().unwrap();
        assert_eq!(reloaded.generation(), 2);
        // old readers keep their snapshot
        assert_eq!(a.generation(), 1);
        assert!(Arc::ptr_eq(&manager.current(), &reloaded));
    }

    #[test]
    fn test_invalidate_rebuilds_on_next_batch() {
        let (source, manager) = manager();
        let before = manager.snapshot_for_batch();
        assert_eq!(before.generation(), 1);
        assert_eq!(
            before.match_brush("Semogue 610").match_type,
            MatchType::Strategy
        );

        let mut inputs = fixtures::snapshot_inputs();
        inputs
            .correct_matches
            .brush
            .push(fixtures::product_override(&["Semogue 610"], "Semogue", "610"));
        source.replace(inputs);

        // not visible until invalidated
        assert_eq!(manager.snapshot_for_batch().generation(), 1);

        manager.invalidate();
        let after = manager.snapshot_for_batch();
        assert_eq!(after.generation(), 2);
        assert!(!manager.is_stale());
        assert_eq!(after.match_brush("Semogue 610").match_type, MatchType::Exact);
        assert_ne!(before.fingerprint(), after.fingerprint());
    }

    #[test]
    fn test_failed_reload_keeps_previous_snapshot() {
        let (source, manager) = manager();
        let mut inputs = fixtures::snapshot_inputs();
        inputs
            .correct_matches
            .knot
            .push(fixtures::product_override(&["Declaration B15 knot"], "Other", "X"));
        source.replace(inputs);

        manager.invalidate();
        let snapshot = manager.snapshot_for_batch();
        assert_eq!(snapshot.generation(), 1);
        assert!(manager.is_stale());

        // fixed data is picked up by the next batch
        source.replace(fixtures::snapshot_inputs());
        let snapshot = manager.snapshot_for_batch();
        assert!(snapshot.generation() > 1);
        assert!(!manager.is_stale());
    }
}
