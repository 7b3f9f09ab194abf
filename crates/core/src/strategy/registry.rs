//! Ordered strategy lists, validated at construction.

use thiserror::Error;
use tracing::trace;

use super::scorer::select;
use super::types::{Component, MatchCandidate};
use super::Strategy;
use crate::catalog::CatalogIndex;
use crate::config::StrategyConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("No strategies registered for {0}")]
    Empty(Component),

    #[error(
        "Strategy '{strategy}' (score {score}) registered after '{previous}' (score {previous_score}) in the {component} registry"
    )]
    OrderingViolation {
        component: Component,
        strategy: Strategy,
        score: u32,
        previous: Strategy,
        previous_score: u32,
    },

    #[error("Strategy '{strategy}' cannot match a {component}")]
    UnsupportedComponent {
        component: Component,
        strategy: Strategy,
    },

    #[error("Strategy '{strategy}' registered twice in the {component} registry")]
    Duplicate {
        component: Component,
        strategy: Strategy,
    },

    #[error("Unknown strategy '{id}' in the {component} registry")]
    UnknownStrategy { component: Component, id: String },
}

/// Strategies for one component, in ascending score order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyRegistry {
    component: Component,
    strategies: Vec<Strategy>,
}

impl StrategyRegistry {
    /// Validate and wrap a registration list.
    ///
    /// Scores must be non-decreasing in registration order; equal scores are
    /// allowed and resolved by position.
    pub fn new(component: Component, strategies: Vec<Strategy>) -> Result<Self, RegistryError> {
        if strategies.is_empty() {
            return Err(RegistryError::Empty(component));
        }

        for (i, strategy) in strategies.iter().enumerate() {
            if !strategy.supports(component) {
                return Err(RegistryError::UnsupportedComponent {
                    component,
                    strategy: *strategy,
                });
            }
            if strategies[..i].contains(strategy) {
                return Err(RegistryError::Duplicate {
                    component,
                    strategy: *strategy,
                });
            }
            if let Some(previous) = i.checked_sub(1).map(|p| strategies[p]) {
                if strategy.score() < previous.score() {
                    return Err(RegistryError::OrderingViolation {
                        component,
                        strategy: *strategy,
                        score: strategy.score(),
                        previous,
                        previous_score: previous.score(),
                    });
                }
            }
        }

        Ok(Self {
            component,
            strategies,
        })
    }

    /// Build from strategy identifiers, as written in configuration.
    pub fn from_ids<S: AsRef<str>>(component: Component, ids: &[S]) -> Result<Self, RegistryError> {
        let strategies = ids
            .iter()
            .map(|id| {
                Strategy::from_id(id.as_ref()).ok_or_else(|| RegistryError::UnknownStrategy {
                    component,
                    id: id.as_ref().to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(component, strategies)
    }

    pub fn defaults(component: Component) -> Self {
        Self {
            component,
            strategies: Strategy::defaults(component),
        }
    }

    pub fn component(&self) -> Component {
        self.component
    }

    pub fn strategies(&self) -> &[Strategy] {
        &self.strategies
    }

    /// Every candidate produced for `text`, in registration order.
    pub fn collect(&self, text: &str, catalog: &CatalogIndex) -> Vec<MatchCandidate> {
        self.strategies
            .iter()
            .enumerate()
            .filter_map(|(rank, strategy)| {
                let mut candidate = strategy.try_match(text, self.component, catalog)?;
                candidate.rank = rank;
                trace!(
                    "{} candidate from {} (score {}): {:?}",
                    self.component,
                    strategy,
                    candidate.score,
                    candidate.identity
                );
                Some(candidate)
            })
            .collect()
    }

    /// Winning candidate for `text`, if any strategy matched.
    pub fn best(&self, text: &str, catalog: &CatalogIndex) -> Option<MatchCandidate> {
        select(self.collect(text, catalog))
    }
}

/// One registry per component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registries {
    pub whole: StrategyRegistry,
    pub handle: StrategyRegistry,
    pub knot: StrategyRegistry,
}

impl Default for Registries {
    fn default() -> Self {
        Self {
            whole: StrategyRegistry::defaults(Component::Whole),
            handle: StrategyRegistry::defaults(Component::Handle),
            knot: StrategyRegistry::defaults(Component::Knot),
        }
    }
}

impl Registries {
    /// Configured lists where given, built-in orders elsewhere.
    pub fn from_config(config: &StrategyConfig) -> Result<Self, RegistryError> {
        let build = |component: Component, ids: &Option<Vec<String>>| match ids {
            Some(ids) => StrategyRegistry::from_ids(component, ids),
            None => Ok(StrategyRegistry::defaults(component)),
        };
        Ok(Self {
            whole: build(Component::Whole, &config.whole)?,
            handle: build(Component::Handle, &config.handle)?,
            knot: build(Component::Knot, &config.knot)?,
        })
    }

    pub fn get(&self, component: Component) -> &StrategyRegistry {
        match component {
            Component::Whole => &self.whole,
            Component::Handle => &self.handle,
            Component::Knot => &self.knot,
        }
    }
}
