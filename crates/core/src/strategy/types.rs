//! Candidate types shared by strategies, the registry and the scorer.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Strategy;
use crate::catalog::ProductIdentity;

/// What a piece of text is being matched as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Component {
    Whole,
    Handle,
    Knot,
}

impl Component {
    pub fn as_str(&self) -> &'static str {
        match self {
            Component::Whole => "whole",
            Component::Handle => "handle",
            Component::Knot => "knot",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Intrinsic strategy scores. Lower is more specific.
pub mod scores {
    pub const BRAND_FAMILY: u32 = 10;
    pub const CATALOG_MODEL: u32 = 20;
    pub const BRAND_DEFAULT: u32 = 40;
    pub const FIBER_FALLBACK: u32 = 60;
    pub const SIZE_FALLBACK: u32 = 70;
}

/// What a strategy recognised, before it is ranked.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyHit {
    pub identity: ProductIdentity,
    /// Catalog pattern or built-in rule that fired.
    pub pattern: Option<String>,
}

/// One strategy's answer for one piece of text.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCandidate {
    pub component: Component,
    pub strategy: Strategy,
    pub identity: ProductIdentity,
    pub score: u32,
    /// Registration position in the registry that produced it.
    pub rank: usize,
    pub source_text: String,
    pub pattern: Option<String>,
}
