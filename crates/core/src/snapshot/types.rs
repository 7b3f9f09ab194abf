use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::catalog::{CatalogError, CatalogSources};
use crate::config::{ConfigError, MatchingConfig};
use crate::overrides::{CorrectMatchFile, OverrideError};
use crate::split::SplitRulesError;
use crate::strategy::RegistryError;

/// Raw data a snapshot is built from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotInputs {
    pub catalog: CatalogSources,
    #[serde(default)]
    pub correct_matches: CorrectMatchFile,
}

impl SnapshotInputs {
    /// Short content hash, stable across runs for identical inputs.
    pub fn fingerprint(&self) -> String {
        let bytes = serde_json::to_vec(self).unwrap_or_default();
        let digest = format!("{:x}", Sha256::digest(&bytes));
        digest[..12].to_string()
    }
}

/// Build-time options that come from configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapshotSettings {
    pub matching: MatchingConfig,
    /// Any malformed catalog pattern fails the build.
    pub strict_patterns: bool,
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Invalid split rules: {0}")]
    SplitRules(#[from] SplitRulesError),

    #[error("Invalid strategy registry: {0}")]
    Registry(#[from] RegistryError),

    #[error("Correct matches rejected ({} errors): {}", .0.len(), join_errors(.0))]
    Overrides(Vec<OverrideError>),
}

fn join_errors(errors: &[OverrideError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overrides::OverrideKind;
    use crate::testing::fixtures;

    #[test]
    fn test_fingerprint_tracks_content() {
        let inputs = fixtures::snapshot_inputs();
        let same = fixtures::snapshot_inputs();
        assert_eq!(inputs.fingerprint(), same.fingerprint());
        assert_eq!(inputs.fingerprint().len(), 12);

        let mut changed = fixtures::snapshot_inputs();
        changed.correct_matches.knot.clear();
        assert_ne!(inputs.fingerprint(), changed.fingerprint());
    }

    #[test]
    fn test_override_errors_display() {
        let err = SnapshotError::Overrides(vec![
            OverrideError::InvalidEntry {
                kind: OverrideKind::Knot,
                index: 0,
                reason: "missing brand".to_string(),
            },
            OverrideError::NotPromotable {
                original: "x".to_string(),
                reason: "result is unmatched".to_string(),
            },
        ]);
        assert_eq!(
            err.to_string(),
            "Correct matches rejected (2 errors): Invalid knot override #0: missing brand; Cannot promote 'x': result is unmatched"
        );
    }
}
