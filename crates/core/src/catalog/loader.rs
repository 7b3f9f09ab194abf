//! Reading catalog files from disk.

use std::path::Path;

use serde::de::DeserializeOwned;

use super::error::CatalogError;
use super::types::{CatalogFileNames, CatalogSources};

/// Read and parse the three catalog files.
pub fn load_catalog_sources(
    brushes: &Path,
    handles: &Path,
    knots: &Path,
) -> Result<CatalogSources, CatalogError> {
    Ok(CatalogSources {
        brushes: read_toml(brushes)?,
        handles: read_toml(handles)?,
        knots: read_toml(knots)?,
        files: CatalogFileNames {
            brushes: file_label(brushes),
            handles: file_label(handles),
            knots: file_label(knots),
        },
    })
}

/// Parse a TOML catalog file, reporting errors against its name.
pub fn read_toml<T: DeserializeOwned>(path: &Path) -> Result<T, CatalogError> {
    if !path.exists() {
        return Err(CatalogError::FileNotFound(path.display().to_string()));
    }

    let content = std::fs::read_to_string(path).map_err(|e| CatalogError::Io {
        file: path.display().to_string(),
        message: e.to_string(),
    })?;

    toml::from_str(&content).map_err(|e| CatalogError::Parse {
        file: file_label(path),
        message: e.to_string(),
    })
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
