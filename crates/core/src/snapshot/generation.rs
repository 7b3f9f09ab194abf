use tracing::info;

use super::types::{SnapshotError, SnapshotInputs, SnapshotSettings};
use crate::catalog::{CatalogError, CatalogIndex, CatalogStats, PatternError};
use crate::matcher::{BrushMatcher, MatchResult};
use crate::metrics;
use crate::overrides::CorrectMatchStore;
use crate::split::SplitResolver;
use crate::strategy::Registries;

/// One immutable generation of catalog, overrides, and matching rules.
#[derive(Debug, Clone)]
pub struct Snapshot {
    matcher: BrushMatcher,
    generation: u64,
    fingerprint: String,
    pattern_errors: Vec<PatternError>,
}

impl Snapshot {
    /// Compile `inputs` under `settings`.
    ///
    /// Malformed catalog patterns skip their entries (or fail the build when
    /// `strict_patterns` is set). Composite overrides without a recorded
    /// intent get one from the surface-order rule.
    pub fn build(
        inputs: &SnapshotInputs,
        settings: &SnapshotSettings,
        generation: u64,
    ) -> Result<Self, SnapshotError> {
        let build = CatalogIndex::build(&inputs.catalog);
        metrics::CATALOG_PATTERN_ERRORS.inc_by(build.errors.len() as u64);
        if settings.strict_patterns {
            if let Some(first) = build.errors.first() {
                return Err(CatalogError::MalformedPatterns {
                    count: build.errors.len(),
                    first: first.clone(),
                }
                .into());
            }
        }
        let catalog = build.index;

        let splitter = SplitResolver::new(&settings.matching.split)?;
        let registries = Registries::from_config(&settings.matching.strategies)?;
        let overrides = CorrectMatchStore::from_file(&inputs.correct_matches, |original| {
            splitter.infer_intent(original.trim(), &catalog)
        })
        .map_err(SnapshotError::Overrides)?;

        let fingerprint = inputs.fingerprint();
        let stats = catalog.stats();
        info!(
            "Built snapshot generation {} ({}): {} known brushes, {} handle models, {} knots, {} overrides, {} pattern errors",
            generation,
            fingerprint,
            stats.known_brushes,
            stats.handle_models,
            stats.known_knots + stats.other_knots,
            overrides.total_len(),
            build.errors.len()
        );

        Ok(Self {
            matcher: BrushMatcher::new(catalog, overrides, registries, splitter),
            generation,
            fingerprint,
            pattern_errors: build.errors,
        })
    }

    pub fn match_brush(&self, text: &str) -> MatchResult {
        self.matcher.match_brush(text)
    }

    pub fn matcher(&self) -> &BrushMatcher {
        &self.matcher
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn stats(&self) -> CatalogStats {
        self.matcher.catalog().stats()
    }

    /// Catalog entries skipped while building this snapshot.
    pub fn pattern_errors(&self) -> &[PatternError] {
        &self.pattern_errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Fiber, RawModelEntry};
    use crate::matcher::{MatchType, UserIntent};
    use crate::overrides::{OverrideKind, RawOverride};
    use crate::strategy::Component;
    use crate::testing::fixtures;

    fn broken_inputs() -> SnapshotInputs {
        let mut inputs = fixtures::snapshot_inputs();
        inputs
            .catalog
            .knots
            .known_knots
            .entry("Broken".to_string())
            .or_default()
            .insert(
                "K1".to_string(),
                RawModelEntry {
                    patterns: vec!["(unclosed".to_string()],
                    fiber: Some(Fiber::Boar),
                    knot_size_mm: None,
                },
            );
        inputs
    }

    #[test]
    fn test_build_from_fixtures() {
        let snapshot =
            Snapshot::build(&fixtures::snapshot_inputs(), &SnapshotSettings::default(), 7).unwrap();
        assert_eq!(snapshot.generation(), 7);
        assert_eq!(snapshot.fingerprint().len(), 12);
        assert!(snapshot.pattern_errors().is_empty());
        assert_eq!(snapshot.stats().known_knots, 2);
        assert_eq!(
            snapshot.matcher().overrides().len(OverrideKind::Complete),
            1
        );
        assert_eq!(
            snapshot.match_brush("Simpson Chubby II").match_type,
            MatchType::Exact
        );
    }

    #[test]
    fn test_malformed_pattern_skips_entry() {
        let snapshot = Snapshot::build(&broken_inputs(), &SnapshotSettings::default(), 1).unwrap();
        assert_eq!(snapshot.pattern_errors().len(), 1);
        let err = &snapshot.pattern_errors()[0];
        assert_eq!(err.brand, "Broken");
        assert_eq!(err.field.as_deref(), Some("known_knots"));
        // the rest of the catalog still matches
        assert_eq!(snapshot.stats().known_knots, 2);
    }

    #[test]
    fn test_strict_patterns_fail_build() {
        let settings = SnapshotSettings {
            strict_patterns: true,
            ..SnapshotSettings::default()
        };
        let err = Snapshot::build(&broken_inputs(), &settings, 1).unwrap_err();
        assert!(matches!(
            err,
            SnapshotError::Catalog(CatalogError::MalformedPatterns { count: 1, .. })
        ));
    }

    #[test]
    fn test_bad_strategy_config_fails_build() {
        let mut settings = SnapshotSettings::default();
        settings.matching.strategies.handle = Some(vec!["known_knot".to_string()]);
        let err = Snapshot::build(&fixtures::snapshot_inputs(), &settings, 1).unwrap_err();
        assert!(matches!(err, SnapshotError::Registry(_)));
        assert!(err.to_string().contains("cannot match a handle"));
    }

    #[test]
    fn test_ambiguous_overrides_fail_build() {
        let mut inputs = fixtures::snapshot_inputs();
        inputs
            .correct_matches
            .knot
            .push(fixtures::product_override(&["declaration  b15 KNOT"], "Declaration Grooming", "B14"));
        let err = Snapshot::build(&inputs, &SnapshotSettings::default(), 1).unwrap_err();
        assert!(matches!(err, SnapshotError::Overrides(ref errors) if errors.len() == 1));
    }

    #[test]
    fn test_composite_override_intent_inferred_at_build() {
        let mut inputs = fixtures::snapshot_inputs();
        inputs.correct_matches.brush.push(RawOverride {
            strings: vec!["DG B15 w/ C&H Zebra".to_string()],
            handle: Some(crate::catalog::ProductIdentity::new("Chisel & Hound", "Zebra")),
            knot: Some(crate::catalog::ProductIdentity::new("Declaration Grooming", "B15")),
            ..RawOverride::default()
        });
        let snapshot = Snapshot::build(&inputs, &SnapshotSettings::default(), 1).unwrap();
        let entry = snapshot
            .matcher()
            .overrides()
            .lookup("dg b15 w/ c&h zebra", OverrideKind::Complete)
            .unwrap();
        assert_eq!(entry.user_intent, Some(UserIntent::KnotPrimary));
        assert_eq!(
            snapshot.matcher().registries().get(Component::Knot).strategies().len(),
            6
        );
    }
}
