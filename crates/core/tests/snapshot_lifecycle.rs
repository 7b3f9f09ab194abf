//! Snapshot lifecycle against catalog files on disk.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use brushmatch_core::catalog::CatalogError;
use brushmatch_core::{
    load_config, validate_config, BatchRunner, BrushRecord, FileSnapshotSource, MatchType,
    SnapshotError, SnapshotManager, SnapshotSettings,
};

const BRUSHES: &str = r#"
[known_brushes.Semogue."610"]
patterns = ["semogue.*610"]
fiber = "Boar"
knot_size_mm = 21.0

[other_brushes.Omega]
patterns = ["omega"]
default_fiber = "Boar"
"#;

const HANDLES: &str = r#"
[artisan_handles."Chisel & Hound"]
patterns = ["chisel\\s*(?:&|and)\\s*hound", "\\bc\\s*(?:&|and)\\s*h\\b"]

[artisan_handles."Chisel & Hound".models.Zebra]
patterns = ["(?:chisel\\s*(?:&|and)\\s*hound|\\bc\\s*(?:&|and)\\s*h\\b).*zebra"]
"#;

const KNOTS: &str = r#"
[known_knots."Declaration Grooming".B15]
patterns = ["(?:\\bdg\\b|declaration).*\\bb15\\b"]
fiber = "Badger"
knot_size_mm = 26.0
"#;

const CORRECT_MATCHES: &str = r#"
[[brush]]
strings = ["Simpson Chubby II"]
brand = "Simpson"
model = "Chubby 2"
"#;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new(strict: bool) -> Self {
        let dir = TempDir::new().unwrap();
        let ws = Self { dir };
        ws.write("brushes.toml", BRUSHES);
        ws.write("handles.toml", HANDLES);
        ws.write("knots.toml", KNOTS);
        ws.write("correct_matches.toml", CORRECT_MATCHES);
        ws.write(
            "config.toml",
            &format!(
                r#"
[catalog]
brushes = "brushes.toml"
handles = "handles.toml"
knots = "knots.toml"
correct_matches = "correct_matches.toml"
strict_patterns = {}

[batch]
workers = 2
"#,
                strict
            ),
        );
        ws
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn write(&self, name: &str, content: &str) {
        std::fs::write(self.path(name), content).unwrap();
    }

    fn manager(&self) -> Result<SnapshotManager, SnapshotError> {
        let config_path = self.path("config.toml");
        let config = load_config(&config_path).unwrap();
        validate_config(&config).unwrap();

        let base = config_path.parent().unwrap_or_else(|| Path::new("."));
        let catalog = config.catalog.resolved_against(base);
        let settings = SnapshotSettings {
            matching: config.matching.clone(),
            strict_patterns: catalog.strict_patterns,
        };
        SnapshotManager::new(FileSnapshotSource::new(catalog), settings)
    }
}

fn record(id: &str, month: &str, brush: &str) -> BrushRecord {
    BrushRecord {
        id: id.to_string(),
        month: month.to_string(),
        brush: brush.to_string(),
    }
}

#[test]
fn loads_and_matches_from_files() {
    let ws = Workspace::new(false);
    let manager = ws.manager().unwrap();
    let snapshot = manager.current();

    assert_eq!(snapshot.generation(), 1);
    assert!(snapshot.pattern_errors().is_empty());
    assert_eq!(snapshot.match_brush("Simpson Chubby II").match_type, MatchType::Exact);
    assert_eq!(snapshot.match_brush("Semogue 610").match_type, MatchType::Strategy);

    let result = snapshot.match_brush("DG B15 w/ C&H Zebra");
    let composite = result.composite().unwrap();
    assert!(composite.handle.is_some());
    assert!(composite.knot.is_some());
}

#[test]
fn edited_overrides_apply_after_invalidate() {
    let ws = Workspace::new(false);
    let manager = ws.manager().unwrap();
    let runner = BatchRunner::new(2).unwrap();

    let january = runner.match_by_month(&manager, &[record("1", "2025-01", "Semogue 610")]);
    assert_eq!(january[0].records[0].result.match_type, MatchType::Strategy);

    ws.write(
        "correct_matches.toml",
        &format!(
            "{}\n[[brush]]\nstrings = [\"Semogue 610\"]\nbrand = \"Semogue\"\nmodel = \"610\"\n",
            CORRECT_MATCHES
        ),
    );
    // editing files alone changes nothing
    assert_eq!(manager.snapshot_for_batch().generation(), 1);

    manager.invalidate();
    let february = runner.match_by_month(&manager, &[record("2", "2025-02", "Semogue 610")]);
    assert_eq!(february[0].generation, 2);
    assert_eq!(february[0].records[0].result.match_type, MatchType::Exact);
}

#[test]
fn broken_reload_keeps_serving() {
    let ws = Workspace::new(false);
    let manager = ws.manager().unwrap();
    let fingerprint = manager.current().fingerprint().to_string();

    ws.write("knots.toml", "this is not = = toml");
    manager.invalidate();
    assert!(manager.reload().is_err());
    assert!(manager.is_stale());

    let snapshot = manager.snapshot_for_batch();
    assert_eq!(snapshot.generation(), 1);
    assert_eq!(snapshot.fingerprint(), fingerprint);
    assert_eq!(snapshot.match_brush("Semogue 610").match_type, MatchType::Strategy);
}

#[test]
fn malformed_pattern_is_skipped_or_fatal() {
    let broken = format!("{}\n[known_brushes.Elite.Bad]\npatterns = [\"elite(\"]\n", BRUSHES);

    let lenient = Workspace::new(false);
    lenient.write("brushes.toml", &broken);
    let snapshot = lenient.manager().unwrap().current();
    assert_eq!(snapshot.pattern_errors().len(), 1);
    assert_eq!(snapshot.pattern_errors()[0].brand, "Elite");
    assert_eq!(snapshot.match_brush("Semogue 610").match_type, MatchType::Strategy);

    let strict = Workspace::new(true);
    strict.write("brushes.toml", &broken);
    let err = strict.manager().unwrap_err();
    assert!(matches!(
        err,
        SnapshotError::Catalog(CatalogError::MalformedPatterns { count: 1, .. })
    ));
}
