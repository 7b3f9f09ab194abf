//! The per-input matching pipeline.

use tracing::debug;

use super::assemble::assemble;
use super::types::{ComponentMatch, MatchResult, MatchType, UserIntent, MATCHED_BY_OVERRIDE};
use crate::catalog::{CatalogIndex, ProductIdentity};
use crate::metrics;
use crate::normalize::normalize;
use crate::overrides::{CorrectMatchStore, OverrideCanonical, OverrideEntry, OverrideKind};
use crate::split::{SplitOutcome, SplitResolver};
use crate::strategy::{Component, Registries};

/// Everything needed to match one string. Immutable once built.
///
/// Order per input: complete-kind override lookup, then composite detection,
/// then either one whole-product strategy pass or independent handle and
/// knot passes (each trying its own override partition first). A composite
/// with an unresolved half falls back to a whole-product match if one exists.
#[derive(Debug, Clone)]
pub struct BrushMatcher {
    catalog: CatalogIndex,
    overrides: CorrectMatchStore,
    registries: Registries,
    splitter: SplitResolver,
}

impl BrushMatcher {
    pub fn new(
        catalog: CatalogIndex,
        overrides: CorrectMatchStore,
        registries: Registries,
        splitter: SplitResolver,
    ) -> Self {
        Self {
            catalog,
            overrides,
            registries,
            splitter,
        }
    }

    pub fn catalog(&self) -> &CatalogIndex {
        &self.catalog
    }

    pub fn overrides(&self) -> &CorrectMatchStore {
        &self.overrides
    }

    pub fn registries(&self) -> &Registries {
        &self.registries
    }

    pub fn splitter(&self) -> &SplitResolver {
        &self.splitter
    }

    /// Surface-order intent for `text` against this matcher's catalog.
    pub fn infer_intent(&self, text: &str) -> UserIntent {
        self.splitter.infer_intent(text.trim(), &self.catalog)
    }

    /// Same matcher with a different correct-match store.
    pub fn with_overrides(&self, overrides: CorrectMatchStore) -> Self {
        Self {
            overrides,
            ..self.clone()
        }
    }

    /// Match one brush description. Never fails; no match is `Unmatched`.
    pub fn match_brush(&self, text: &str) -> MatchResult {
        let result = self.evaluate(text);
        metrics::MATCH_RESULTS
            .with_label_values(&[result.match_type.as_str()])
            .inc();
        result
    }

    fn evaluate(&self, text: &str) -> MatchResult {
        let normalized = normalize(text);
        if normalized.is_empty() {
            return MatchResult::unmatched(text, &normalized);
        }

        if let Some(entry) = self.overrides.lookup(&normalized, OverrideKind::Complete) {
            debug!("'{}' served from correct matches", normalized);
            return self.from_override(text, &normalized, entry);
        }

        let trimmed = text.trim();
        match self.splitter.split(trimmed, &self.catalog) {
            SplitOutcome::NotComposite => {
                metrics::SPLIT_OUTCOMES
                    .with_label_values(&["not_composite"])
                    .inc();
                let whole = self.resolve(Component::Whole, trimmed);
                assemble(text, &normalized, whole, None, None, None)
            }
            SplitOutcome::Composite(split) => {
                metrics::SPLIT_OUTCOMES.with_label_values(&["composite"]).inc();
                let handle = self.resolve_part(OverrideKind::Handle, Component::Handle, &split.handle_text);
                let knot = self.resolve_part(OverrideKind::Knot, Component::Knot, &split.knot_text);

                // A half-resolved split loses to a complete-brush match of the whole text.
                if handle.is_none() || knot.is_none() {
                    if let Some(whole) = self.resolve(Component::Whole, trimmed) {
                        debug!(
                            "'{}' kept whole: split on '{}' resolved only one half",
                            trimmed, split.separator
                        );
                        return assemble(text, &normalized, Some(whole), None, None, None);
                    }
                }
                assemble(text, &normalized, None, handle, knot, Some(split.user_intent))
            }
        }
    }

    /// Handle or knot: its override partition first, then strategies.
    fn resolve_part(&self, kind: OverrideKind, component: Component, text: &str) -> Option<ComponentMatch> {
        if let Some(entry) = self.overrides.lookup_text(text, kind) {
            if let OverrideCanonical::Product(identity) = &entry.canonical {
                debug!("{} '{}' served from correct matches", component, text);
                return Some(override_component(identity, text));
            }
        }
        self.resolve(component, text)
    }

    fn resolve(&self, component: Component, text: &str) -> Option<ComponentMatch> {
        let winner = self.registries.get(component).best(text, &self.catalog)?;
        debug!(
            "{} '{}' matched by {} (score {})",
            component, text, winner.strategy, winner.score
        );
        metrics::STRATEGY_WINS
            .with_label_values(&[component.as_str(), winner.strategy.id()])
            .inc();

        Some(ComponentMatch {
            identity: winner.identity,
            source_text: winner.source_text,
            match_type: MatchType::Strategy,
            matched_by: winner.strategy.id().to_string(),
            pattern: winner.pattern,
        })
    }

    fn from_override(&self, text: &str, normalized: &str, entry: &OverrideEntry) -> MatchResult {
        let trimmed = text.trim();
        match &entry.canonical {
            OverrideCanonical::Product(identity) => assemble(
                text,
                normalized,
                Some(override_component(identity, trimmed)),
                None,
                None,
                None,
            ),
            OverrideCanonical::Composite { handle, knot } => {
                let (handle_text, knot_text) = match self.splitter.split(trimmed, &self.catalog) {
                    SplitOutcome::Composite(split) => (split.handle_text, split.knot_text),
                    SplitOutcome::NotComposite => (trimmed.to_string(), trimmed.to_string()),
                };
                let user_intent = entry
                    .user_intent
                    .unwrap_or_else(|| self.infer_intent(trimmed));

                let mut result = assemble(
                    text,
                    normalized,
                    None,
                    Some(override_component(handle, &handle_text)),
                    Some(override_component(knot, &knot_text)),
                    Some(user_intent),
                );
                result.matched_by = Some(MATCHED_BY_OVERRIDE.to_string());
                result
            }
        }
    }
}

fn override_component(identity: &ProductIdentity, source_text: &str) -> ComponentMatch {
    ComponentMatch {
        identity: identity.clone(),
        source_text: source_text.to_string(),
        match_type: MatchType::Exact,
        matched_by: MATCHED_BY_OVERRIDE.to_string(),
        pattern: None,
    }
}
