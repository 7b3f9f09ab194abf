//! Correct-match (override) types.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{Fiber, ProductIdentity};
use crate::matcher::UserIntent;

/// Override partition. The same text may appear once per partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrideKind {
    Complete,
    Handle,
    Knot,
}

impl fmt::Display for OverrideKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OverrideKind::Complete => "complete",
            OverrideKind::Handle => "handle",
            OverrideKind::Knot => "knot",
        })
    }
}

/// Confirmed identity stored in an override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum OverrideCanonical {
    Product(ProductIdentity),
    Composite {
        handle: ProductIdentity,
        knot: ProductIdentity,
    },
}

impl OverrideCanonical {
    /// Short human-readable form for diagnostics.
    pub fn describe(&self) -> String {
        fn name(identity: &ProductIdentity) -> String {
            format!(
                "{} {}",
                identity.brand.as_deref().unwrap_or("?"),
                identity.model.as_deref().unwrap_or("?")
            )
        }
        match self {
            OverrideCanonical::Product(identity) => name(identity),
            OverrideCanonical::Composite { handle, knot } => {
                format!("handle {} + knot {}", name(handle), name(knot))
            }
        }
    }
}

/// One confirmed mapping from normalized text to a canonical result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverrideEntry {
    pub normalized_key: String,
    pub kind: OverrideKind,
    pub canonical: OverrideCanonical,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_intent: Option<UserIntent>,
}

/// Errors for building or extending the correct-match store.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OverrideError {
    #[error("Ambiguous {kind} override key '{key}': mapped to both '{existing}' and '{conflicting}'")]
    AmbiguousKey {
        kind: OverrideKind,
        key: String,
        existing: String,
        conflicting: String,
    },

    #[error("Invalid {kind} override #{index}: {reason}")]
    InvalidEntry {
        kind: OverrideKind,
        index: usize,
        reason: String,
    },

    #[error("Cannot promote '{original}': {reason}")]
    NotPromotable { original: String, reason: String },
}

/// Correct-match file: one array per partition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorrectMatchFile {
    #[serde(default)]
    pub brush: Vec<RawOverride>,
    #[serde(default)]
    pub handle: Vec<RawOverride>,
    #[serde(default)]
    pub knot: Vec<RawOverride>,
}

/// One override as written by curators.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawOverride {
    /// Original texts that map to this identity.
    pub strings: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiber: Option<Fiber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knot_size_mm: Option<f64>,
    /// Composite brush overrides only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle: Option<ProductIdentity>,
    /// Composite brush overrides only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knot: Option<ProductIdentity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_intent: Option<UserIntent>,
}

impl RawOverride {
    /// Canonical identity for an entry in partition `kind`.
    pub fn canonical(&self, kind: OverrideKind) -> Result<OverrideCanonical, String> {
        let composite = match (&self.handle, &self.knot) {
            (Some(handle), Some(knot)) => Some((handle, knot)),
            (None, None) => None,
            _ => return Err("composite overrides need both handle and knot".to_string()),
        };

        match (kind, composite) {
            (OverrideKind::Complete, Some((handle, knot))) => {
                if handle.brand.is_none() || knot.brand.is_none() {
                    return Err("composite handle and knot need a brand".to_string());
                }
                Ok(OverrideCanonical::Composite {
                    handle: handle.clone(),
                    knot: knot.clone(),
                })
            }
            (_, Some(_)) => Err(format!("{} overrides cannot be composite", kind)),
            (_, None) => {
                let brand = self
                    .brand
                    .clone()
                    .ok_or_else(|| "missing brand".to_string())?;
                if self.user_intent.is_some() {
                    return Err("user_intent is only valid on composite overrides".to_string());
                }
                Ok(OverrideCanonical::Product(ProductIdentity {
                    brand: Some(brand),
                    model: self.model.clone(),
                    fiber: self.fiber,
                    knot_size_mm: self.knot_size_mm,
                }))
            }
        }
    }
}
