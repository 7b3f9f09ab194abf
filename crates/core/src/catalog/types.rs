//! Types for the product catalog: raw file shapes and canonical identities.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Knot fiber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Fiber {
    Badger,
    Boar,
    Synthetic,
    /// Badger/boar blends.
    Mixed,
    Horse,
    Unspecified,
}

impl Fiber {
    pub fn as_str(&self) -> &'static str {
        match self {
            Fiber::Badger => "Badger",
            Fiber::Boar => "Boar",
            Fiber::Synthetic => "Synthetic",
            Fiber::Mixed => "Mixed",
            Fiber::Horse => "Horse",
            Fiber::Unspecified => "Unspecified",
        }
    }
}

impl fmt::Display for Fiber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical identity of a product or sub-component.
///
/// `brand` and `model` are optional because fallback strategies can resolve
/// a brand without a model, or only physical attributes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProductIdentity {
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiber: Option<Fiber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knot_size_mm: Option<f64>,
}

impl ProductIdentity {
    pub fn new(brand: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            brand: Some(brand.into()),
            model: Some(model.into()),
            fiber: None,
            knot_size_mm: None,
        }
    }

    pub fn with_fiber(mut self, fiber: Fiber) -> Self {
        self.fiber = Some(fiber);
        self
    }

    pub fn with_knot_size(mut self, knot_size_mm: f64) -> Self {
        self.knot_size_mm = Some(knot_size_mm);
        self
    }
}

/// Product category a catalog file describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Brush,
    Handle,
    Knot,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Category::Brush => "brush",
            Category::Handle => "handle",
            Category::Knot => "knot",
        })
    }
}

/// Handle catalog section. Sections are swept in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleSection {
    ArtisanHandles,
    ManufacturerHandles,
    OtherHandles,
}

impl HandleSection {
    pub const ALL: [HandleSection; 3] = [
        HandleSection::ArtisanHandles,
        HandleSection::ManufacturerHandles,
        HandleSection::OtherHandles,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HandleSection::ArtisanHandles => "artisan_handles",
            HandleSection::ManufacturerHandles => "manufacturer_handles",
            HandleSection::OtherHandles => "other_handles",
        }
    }
}

/// A catalog model with its recognition patterns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawModelEntry {
    #[serde(default)]
    pub patterns: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiber: Option<Fiber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knot_size_mm: Option<f64>,
}

/// A brand recognised without a specific model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawBrandDefault {
    #[serde(default)]
    pub patterns: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_fiber: Option<Fiber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knot_size_mm: Option<f64>,
}

/// `brand -> model -> entry`
pub type ModelTable = BTreeMap<String, BTreeMap<String, RawModelEntry>>;

/// Complete brush catalog file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrushCatalogFile {
    #[serde(default)]
    pub known_brushes: ModelTable,
    #[serde(default)]
    pub other_brushes: BTreeMap<String, RawBrandDefault>,
}

/// Knot catalog file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnotCatalogFile {
    #[serde(default)]
    pub known_knots: ModelTable,
    #[serde(default)]
    pub other_knots: BTreeMap<String, RawBrandDefault>,
}

/// A handle maker: maker-level patterns plus per-model patterns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawHandleMaker {
    #[serde(default)]
    pub patterns: Vec<String>,
    #[serde(default)]
    pub models: BTreeMap<String, RawHandleModel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawHandleModel {
    #[serde(default)]
    pub patterns: Vec<String>,
}

/// Handle catalog file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HandleCatalogFile {
    #[serde(default)]
    pub artisan_handles: BTreeMap<String, RawHandleMaker>,
    #[serde(default)]
    pub manufacturer_handles: BTreeMap<String, RawHandleMaker>,
    #[serde(default)]
    pub other_handles: BTreeMap<String, RawHandleMaker>,
}

impl HandleCatalogFile {
    pub fn section(&self, section: HandleSection) -> &BTreeMap<String, RawHandleMaker> {
        match section {
            HandleSection::ArtisanHandles => &self.artisan_handles,
            HandleSection::ManufacturerHandles => &self.manufacturer_handles,
            HandleSection::OtherHandles => &self.other_handles,
        }
    }
}

/// File names reported in diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogFileNames {
    pub brushes: String,
    pub handles: String,
    pub knots: String,
}

impl Default for CatalogFileNames {
    fn default() -> Self {
        Self {
            brushes: "brushes.toml".to_string(),
            handles: "handles.toml".to_string(),
            knots: "knots.toml".to_string(),
        }
    }
}

/// Parsed, not yet compiled, catalog data for one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogSources {
    #[serde(default)]
    pub brushes: BrushCatalogFile,
    #[serde(default)]
    pub handles: HandleCatalogFile,
    #[serde(default)]
    pub knots: KnotCatalogFile,
    #[serde(default)]
    pub files: CatalogFileNames,
}
