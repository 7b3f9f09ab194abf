use std::fmt;

use thiserror::Error;

use super::types::Category;

/// A recognition pattern that failed to compile.
///
/// Carries everything a curator needs to find the entry: the file, brand,
/// model, the handle section or knot field it lives under, and the
/// compiler's message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternError {
    pub file: String,
    pub category: Category,
    pub brand: String,
    /// `None` for brand-level (default) entries.
    pub model: Option<String>,
    /// Handle catalogs only.
    pub section: Option<String>,
    /// Knot catalogs only.
    pub field: Option<String>,
    pub pattern: String,
    pub message: String,
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid regex pattern '{}' in {} (brand '{}'",
            self.pattern, self.file, self.brand
        )?;
        if let Some(model) = &self.model {
            write!(f, ", model '{}'", model)?;
        }
        if let Some(section) = &self.section {
            write!(f, ", section '{}'", section)?;
        }
        if let Some(field) = &self.field {
            write!(f, ", field '{}'", field)?;
        }
        write!(f, "): {}", self.message)
    }
}

impl std::error::Error for PatternError {}

/// Errors for catalog loading.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to read catalog file {file}: {message}")]
    Io { file: String, message: String },

    #[error("Failed to parse catalog file {file}: {message}")]
    Parse { file: String, message: String },

    #[error("{count} malformed catalog pattern(s); first: {first}")]
    MalformedPatterns { count: usize, first: PatternError },
}
