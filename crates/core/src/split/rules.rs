//! Separator and indicator table for composite detection.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One handle/knot join marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeparatorRule {
    /// Name used in logs.
    pub name: String,
    /// Regex matched case-insensitively; the match is removed when splitting.
    pub pattern: String,
    /// Only split when one side is recognised as a handle and the other
    /// as a knot.
    #[serde(default)]
    pub requires_recognition: bool,
}

impl SeparatorRule {
    pub fn new(name: &str, pattern: &str, requires_recognition: bool) -> Self {
        Self {
            name: name.to_string(),
            pattern: pattern.to_string(),
            requires_recognition,
        }
    }
}

/// Split heuristics, tried in table order.
///
/// Separators carrying strong intent ("w/", "with") split on any evidence;
/// ambiguous ones ("/", "+", "in", " - ") need the catalog to recognise a
/// handle on one side and a knot on the other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitRules {
    #[serde(default = "default_separators")]
    pub separators: Vec<SeparatorRule>,
    /// Extra knot evidence on top of catalog knots, fiber words and sizes.
    #[serde(default = "default_knot_indicators")]
    pub knot_indicators: Vec<String>,
    /// Extra handle evidence on top of catalog handle makers.
    #[serde(default = "default_handle_indicators")]
    pub handle_indicators: Vec<String>,
}

impl Default for SplitRules {
    fn default() -> Self {
        Self {
            separators: default_separators(),
            knot_indicators: default_knot_indicators(),
            handle_indicators: default_handle_indicators(),
        }
    }
}

fn default_separators() -> Vec<SeparatorRule> {
    vec![
        SeparatorRule::new("w/", r"\s*\bw/\s*", false),
        SeparatorRule::new("with", r"\s+with\s+", false),
        SeparatorRule::new("plus", r"\s*\+\s*", true),
        SeparatorRule::new("in", r"\s+in\s+", true),
        SeparatorRule::new("slash", r"\s*/\s*", true),
        SeparatorRule::new("dash", r"\s+-\s+", true),
    ]
}

fn default_knot_indicators() -> Vec<String> {
    vec![r"\bknot\b".to_string()]
}

fn default_handle_indicators() -> Vec<String> {
    vec![r"\bhandle\b".to_string()]
}

/// A split table entry that failed to compile.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SplitRulesError {
    #[error("Separator table is empty")]
    NoSeparators,

    #[error("Invalid {kind} pattern '{pattern}' ({name}): {message}")]
    InvalidPattern {
        kind: &'static str,
        name: String,
        pattern: String,
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_start_with_strong_separators() {
        let rules = SplitRules::default();
        assert_eq!(rules.separators[0].name, "w/");
        assert!(!rules.separators[0].requires_recognition);
        assert!(rules
            .separators
            .iter()
            .filter(|s| s.name == "slash" || s.name == "plus")
            .all(|s| s.requires_recognition));
    }

    #[test]
    fn test_deserialize_custom_table() {
        let toml = r#"
knot_indicators = ["\\bbulb\\b"]

[[separators]]
name = "and"
pattern = "\\s+and\\s+"
requires_recognition = true
"#;
        let rules: SplitRules = toml::from_str(toml).unwrap();
        assert_eq!(rules.separators.len(), 1);
        assert_eq!(rules.separators[0].name, "and");
        assert_eq!(rules.knot_indicators, vec!["\\bbulb\\b"]);
        // untouched lists keep their defaults
        assert_eq!(rules.handle_indicators, default_handle_indicators());
    }
}
