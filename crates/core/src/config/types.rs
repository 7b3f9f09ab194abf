use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::split::SplitRules;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub batch: BatchConfig,
}

/// Where catalog and correct-match data live
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    pub brushes: PathBuf,
    pub handles: PathBuf,
    pub knots: PathBuf,
    /// Correct-match file. No overrides when unset.
    #[serde(default)]
    pub correct_matches: Option<PathBuf>,
    /// Fail the snapshot build on any malformed catalog pattern instead of
    /// skipping the offending entries.
    #[serde(default)]
    pub strict_patterns: bool,
}

impl CatalogConfig {
    /// Resolve relative paths against `base` (usually the config file's directory).
    pub fn resolved_against(&self, base: &Path) -> CatalogConfig {
        let resolve = |p: &PathBuf| {
            if p.is_relative() {
                base.join(p)
            } else {
                p.clone()
            }
        };
        CatalogConfig {
            brushes: resolve(&self.brushes),
            handles: resolve(&self.handles),
            knots: resolve(&self.knots),
            correct_matches: self.correct_matches.as_ref().map(resolve),
            strict_patterns: self.strict_patterns,
        }
    }
}

/// Matching pipeline tuning
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct MatchingConfig {
    #[serde(default)]
    pub split: SplitRules,
    #[serde(default)]
    pub strategies: StrategyConfig,
}

/// Registration order per component, as strategy ids.
/// Unset lists use the built-in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct StrategyConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whole: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knot: Option<Vec<String>>,
}

/// Batch matching
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BatchConfig {
    /// Worker threads; 0 means one per CPU.
    #[serde(default)]
    pub workers: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_paths_resolved() {
        let catalog = CatalogConfig {
            brushes: PathBuf::from("brushes.toml"),
            handles: PathBuf::from("/abs/handles.toml"),
            knots: PathBuf::from("data/knots.toml"),
            correct_matches: Some(PathBuf::from("correct_matches.toml")),
            strict_patterns: false,
        };
        let resolved = catalog.resolved_against(Path::new("/etc/brushmatch"));
        assert_eq!(resolved.brushes, PathBuf::from("/etc/brushmatch/brushes.toml"));
        assert_eq!(resolved.handles, PathBuf::from("/abs/handles.toml"));
        assert_eq!(resolved.knots, PathBuf::from("/etc/brushmatch/data/knots.toml"));
        assert_eq!(
            resolved.correct_matches,
            Some(PathBuf::from("/etc/brushmatch/correct_matches.toml"))
        );
    }
}
