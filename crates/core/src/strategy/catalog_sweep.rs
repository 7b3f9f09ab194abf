//! Strategies that walk one catalog section in sweep order.

use super::types::StrategyHit;
use crate::catalog::{detect_fiber, parse_knot_size, CatalogIndex, PatternSweep};

/// First hit in `sweep`, with attributes the entry leaves open taken from
/// the text. Text attributes win over brand-level defaults.
fn sweep(sweep: &PatternSweep, text: &str, text_overrides_defaults: bool) -> Option<StrategyHit> {
    let hit = sweep.first_match(text)?;
    let mut identity = hit.entry.identity();

    let text_fiber = detect_fiber(text);
    identity.fiber = if text_overrides_defaults {
        text_fiber.or(identity.fiber)
    } else {
        identity.fiber.or(text_fiber)
    };
    identity.knot_size_mm = if text_overrides_defaults {
        parse_knot_size(text).or(identity.knot_size_mm)
    } else {
        identity.knot_size_mm.or_else(|| parse_knot_size(text))
    };

    Some(StrategyHit {
        identity,
        pattern: Some(hit.pattern.to_string()),
    })
}

/// Handles carry no fiber or size.
fn handle_sweep(sweep: &PatternSweep, text: &str) -> Option<StrategyHit> {
    let hit = sweep.first_match(text)?;
    Some(StrategyHit {
        identity: hit.entry.identity(),
        pattern: Some(hit.pattern.to_string()),
    })
}

pub(super) fn known_brush(text: &str, catalog: &CatalogIndex) -> Option<StrategyHit> {
    sweep(catalog.known_brushes(), text, false)
}

pub(super) fn other_brush(text: &str, catalog: &CatalogIndex) -> Option<StrategyHit> {
    sweep(catalog.other_brushes(), text, true)
}

pub(super) fn known_handle(text: &str, catalog: &CatalogIndex) -> Option<StrategyHit> {
    handle_sweep(catalog.handle_models(), text)
}

pub(super) fn handle_maker(text: &str, catalog: &CatalogIndex) -> Option<StrategyHit> {
    handle_sweep(catalog.handle_makers(), text)
}

pub(super) fn known_knot(text: &str, catalog: &CatalogIndex) -> Option<StrategyHit> {
    sweep(catalog.known_knots(), text, false)
}

pub(super) fn other_knot(text: &str, catalog: &CatalogIndex) -> Option<StrategyHit> {
    sweep(catalog.other_knots(), text, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Fiber, ProductIdentity};
    use crate::testing::fixtures;

    #[test]
    fn test_known_brush_keeps_catalog_attributes() {
        let catalog = fixtures::catalog();
        let hit = known_brush("Simpson Chubby 2 boar", &catalog).unwrap();
        assert_eq!(
            hit.identity,
            ProductIdentity::new("Simpson", "Chubby 2")
                .with_fiber(Fiber::Badger)
                .with_knot_size(27.0)
        );
    }

    #[test]
    fn test_other_brush_prefers_text_fiber() {
        let catalog = fixtures::catalog();
        let hit = other_brush("Omega badger 24mm", &catalog).unwrap();
        assert_eq!(hit.identity.brand.as_deref(), Some("Omega"));
        assert_eq!(hit.identity.model, None);
        assert_eq!(hit.identity.fiber, Some(Fiber::Badger));
        assert_eq!(hit.identity.knot_size_mm, Some(24.0));

        let hit = other_brush("Omega", &catalog).unwrap();
        assert_eq!(hit.identity.fiber, Some(Fiber::Boar));
    }

    #[test]
    fn test_handle_model_before_maker() {
        let catalog = fixtures::catalog();
        let hit = known_handle("C&H Zebra", &catalog).unwrap();
        assert_eq!(hit.identity, ProductIdentity::new("Chisel & Hound", "Zebra"));

        assert!(known_handle("C&H Bocote", &catalog).is_none());
        let hit = handle_maker("C&H Bocote", &catalog).unwrap();
        assert_eq!(hit.identity.brand.as_deref(), Some("Chisel & Hound"));
        assert_eq!(hit.identity.model, None);
        assert_eq!(hit.identity.fiber, None);
    }

    #[test]
    fn test_knot_sweeps() {
        let catalog = fixtures::catalog();
        let hit = known_knot("declaration b15", &catalog).unwrap();
        assert_eq!(hit.identity.model.as_deref(), Some("B15"));
        assert!(hit.pattern.is_some());

        let hit = other_knot("semogue boar", &catalog).unwrap();
        assert_eq!(hit.identity.brand.as_deref(), Some("Semogue"));
        assert!(other_knot("mystery knot", &catalog).is_none());
    }
}
