//! Where snapshot inputs come from.

use std::sync::{Arc, RwLock};

use super::types::{SnapshotError, SnapshotInputs};
use crate::catalog::{load_catalog_sources, read_toml};
use crate::config::CatalogConfig;
use crate::overrides::CorrectMatchFile;

/// Produces fresh [`SnapshotInputs`] on every call.
pub trait SnapshotSource: Send + Sync {
    fn load(&self) -> Result<SnapshotInputs, SnapshotError>;

    /// Human-readable origin for logs.
    fn describe(&self) -> String;
}

impl<S: SnapshotSource + ?Sized> SnapshotSource for Arc<S> {
    fn load(&self) -> Result<SnapshotInputs, SnapshotError> {
        (**self).load()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Reads catalog and correct-match files named in configuration.
#[derive(Debug, Clone)]
pub struct FileSnapshotSource {
    paths: CatalogConfig,
}

impl FileSnapshotSource {
    pub fn new(paths: CatalogConfig) -> Self {
        Self { paths }
    }
}

impl SnapshotSource for FileSnapshotSource {
    fn load(&self) -> Result<SnapshotInputs, SnapshotError> {
        let catalog =
            load_catalog_sources(&self.paths.brushes, &self.paths.handles, &self.paths.knots)?;
        let correct_matches = match &self.paths.correct_matches {
            Some(path) => read_toml::<CorrectMatchFile>(path)?,
            None => CorrectMatchFile::default(),
        };
        Ok(SnapshotInputs {
            catalog,
            correct_matches,
        })
    }

    fn describe(&self) -> String {
        let dir = self.paths.brushes.parent().unwrap_or(&self.paths.brushes);
        format!("files under {}", dir.display())
    }
}

/// In-memory inputs that callers can replace between reloads.
#[derive(Debug, Default)]
pub struct StaticSnapshotSource {
    inputs: RwLock<SnapshotInputs>,
}

impl StaticSnapshotSource {
    pub fn new(inputs: SnapshotInputs) -> Self {
        Self {
            inputs: RwLock::new(inputs),
        }
    }

    /// Serve `inputs` from the next load on.
    pub fn replace(&self, inputs: SnapshotInputs) {
        let mut guard = self.inputs.write().unwrap_or_else(|e| e.into_inner());
        *guard = inputs;
    }
}

impl SnapshotSource for StaticSnapshotSource {
    fn load(&self) -> Result<SnapshotInputs, SnapshotError> {
        let guard = self.inputs.read().unwrap_or_else(|e| e.into_inner());
        Ok(guard.clone())
    }

    fn describe(&self) -> String {
        "in-memory inputs".to_string()
    }
}
