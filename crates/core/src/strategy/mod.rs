//! Matching strategies, per-component registries, and candidate selection.
//!
//! A [`Strategy`] recognises one kind of evidence (a brand family's naming
//! scheme, a catalog section, a bare fiber word) and carries a fixed score.
//! A [`StrategyRegistry`] holds the strategies for one [`Component`] in
//! ascending score order and runs them all; [`select`] picks the winner.

mod brand_family;
mod catalog_sweep;
mod fallback;
mod registry;
mod scorer;
mod types;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use registry::{Registries, RegistryError, StrategyRegistry};
pub use scorer::select;
pub use types::{scores, Component, MatchCandidate, StrategyHit};

use crate::catalog::CatalogIndex;

/// Every strategy the engine knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    OmegaSemogue,
    Zenith,
    DeclarationGrooming,
    ChiselAndHound,
    KnownBrush,
    KnownHandle,
    KnownKnot,
    OtherBrush,
    HandleMaker,
    OtherKnot,
    FiberFallback,
    KnotSizeFallback,
}

impl Strategy {
    pub const ALL: [Strategy; 12] = [
        Strategy::OmegaSemogue,
        Strategy::Zenith,
        Strategy::DeclarationGrooming,
        Strategy::ChiselAndHound,
        Strategy::KnownBrush,
        Strategy::KnownHandle,
        Strategy::KnownKnot,
        Strategy::OtherBrush,
        Strategy::HandleMaker,
        Strategy::OtherKnot,
        Strategy::FiberFallback,
        Strategy::KnotSizeFallback,
    ];

    /// Stable identifier, used in results, config and metrics.
    pub fn id(&self) -> &'static str {
        match self {
            Strategy::OmegaSemogue => "omega_semogue",
            Strategy::Zenith => "zenith",
            Strategy::DeclarationGrooming => "declaration_grooming",
            Strategy::ChiselAndHound => "chisel_and_hound",
            Strategy::KnownBrush => "known_brush",
            Strategy::KnownHandle => "known_handle",
            Strategy::KnownKnot => "known_knot",
            Strategy::OtherBrush => "other_brush",
            Strategy::HandleMaker => "handle_maker",
            Strategy::OtherKnot => "other_knot",
            Strategy::FiberFallback => "fiber_fallback",
            Strategy::KnotSizeFallback => "knot_size_fallback",
        }
    }

    pub fn from_id(id: &str) -> Option<Strategy> {
        Strategy::ALL.into_iter().find(|s| s.id() == id)
    }

    pub fn score(&self) -> u32 {
        match self {
            Strategy::OmegaSemogue
            | Strategy::Zenith
            | Strategy::DeclarationGrooming
            | Strategy::ChiselAndHound => scores::BRAND_FAMILY,
            Strategy::KnownBrush | Strategy::KnownHandle | Strategy::KnownKnot => {
                scores::CATALOG_MODEL
            }
            Strategy::OtherBrush | Strategy::HandleMaker | Strategy::OtherKnot => {
                scores::BRAND_DEFAULT
            }
            Strategy::FiberFallback => scores::FIBER_FALLBACK,
            Strategy::KnotSizeFallback => scores::SIZE_FALLBACK,
        }
    }

    pub fn supports(&self, component: Component) -> bool {
        match self {
            Strategy::OmegaSemogue | Strategy::Zenith | Strategy::KnownBrush | Strategy::OtherBrush => {
                component == Component::Whole
            }
            Strategy::DeclarationGrooming | Strategy::ChiselAndHound => {
                matches!(component, Component::Whole | Component::Knot)
            }
            Strategy::KnownHandle | Strategy::HandleMaker => component == Component::Handle,
            Strategy::KnownKnot
            | Strategy::OtherKnot
            | Strategy::FiberFallback
            | Strategy::KnotSizeFallback => component == Component::Knot,
        }
    }

    /// Run this strategy against `text`.
    ///
    /// The returned candidate has rank 0; registries assign the real rank.
    pub fn try_match(
        &self,
        text: &str,
        component: Component,
        catalog: &CatalogIndex,
    ) -> Option<MatchCandidate> {
        let hit = match self {
            Strategy::OmegaSemogue => brand_family::omega_semogue(text, component, catalog),
            Strategy::Zenith => brand_family::zenith(text, component, catalog),
            Strategy::DeclarationGrooming => {
                brand_family::declaration_grooming(text, component, catalog)
            }
            Strategy::ChiselAndHound => brand_family::chisel_and_hound(text, component, catalog),
            Strategy::KnownBrush => catalog_sweep::known_brush(text, catalog),
            Strategy::OtherBrush => catalog_sweep::other_brush(text, catalog),
            Strategy::KnownHandle => catalog_sweep::known_handle(text, catalog),
            Strategy::HandleMaker => catalog_sweep::handle_maker(text, catalog),
            Strategy::KnownKnot => catalog_sweep::known_knot(text, catalog),
            Strategy::OtherKnot => catalog_sweep::other_knot(text, catalog),
            Strategy::FiberFallback => fallback::fiber(text),
            Strategy::KnotSizeFallback => fallback::knot_size(text),
        }?;

        Some(MatchCandidate {
            component,
            strategy: *self,
            identity: hit.identity,
            score: self.score(),
            rank: 0,
            source_text: text.to_string(),
            pattern: hit.pattern,
        })
    }

    /// Built-in registration order for `component`.
    pub fn defaults(component: Component) -> Vec<Strategy> {
        match component {
            Component::Whole => vec![
                Strategy::OmegaSemogue,
                Strategy::Zenith,
                Strategy::DeclarationGrooming,
                Strategy::ChiselAndHound,
                Strategy::KnownBrush,
                Strategy::OtherBrush,
            ],
            Component::Handle => vec![Strategy::KnownHandle, Strategy::HandleMaker],
            Component::Knot => vec![
                Strategy::DeclarationGrooming,
                Strategy::ChiselAndHound,
                Strategy::KnownKnot,
                Strategy::OtherKnot,
                Strategy::FiberFallback,
                Strategy::KnotSizeFallback,
            ],
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
