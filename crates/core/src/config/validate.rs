use std::collections::HashSet;

use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Catalog section exists (enforced by serde)
/// - Split table has at least one separator, none with an empty pattern
/// - Strategy lists, when given, are non-empty and free of duplicates
///
/// Strategy ids and ordering are checked when the registries are built.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let split = &config.matching.split;
    if split.separators.is_empty() {
        return Err(ConfigError::ValidationError(
            "matching.split.separators cannot be empty".to_string(),
        ));
    }
    if let Some(rule) = split.separators.iter().find(|r| r.pattern.trim().is_empty()) {
        return Err(ConfigError::ValidationError(format!(
            "separator '{}' has an empty pattern",
            rule.name
        )));
    }

    let strategies = &config.matching.strategies;
    for (component, list) in [
        ("whole", &strategies.whole),
        ("handle", &strategies.handle),
        ("knot", &strategies.knot),
    ] {
        let Some(ids) = list else { continue };
        if ids.is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "matching.strategies.{} cannot be empty",
                component
            )));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = ids.iter().find(|id| !seen.insert(id.as_str())) {
            return Err(ConfigError::ValidationError(format!(
                "matching.strategies.{} lists '{}' twice",
                component, dup
            )));
        }
    }

    Ok(())
}
