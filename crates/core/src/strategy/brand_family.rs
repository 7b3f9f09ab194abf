//! Dedicated rules for brand families whose model names follow a fixed
//! scheme (model numbers, letter/number series).
//!
//! Each rule extracts brand and model from the text, then takes physical
//! attributes from the catalog entry of that name when there is one.

use once_cell::sync::Lazy;
use regex_lite::{Regex, RegexBuilder};

use super::types::{Component, StrategyHit};
use crate::catalog::{detect_fiber, parse_knot_size, CatalogIndex, Fiber, ProductIdentity};

fn ci(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .expect("built-in brand family regex is valid")
}

const OMEGA_SEMOGUE_RULE: &str = r"\b(omega|semogue)\b[\s\-#.]*(?:model\s*)?(\d{2,6})\b";
const ZENITH_RULE: &str = r"\bzenith\b.*?\b([a-z]{1,2}\d{1,3}[a-z]{0,2}|\d{3}[a-z]{1,2})\b";
const DECLARATION_RULE: &str = r"(?:\bdg\b|\bdeclaration\b)(?:\s+grooming)?.*?\b(b\d{1,2})\b";
const CHISEL_HOUND_RULE: &str =
    r"(?:\bchisel\s*(?:&|and)\s*hound\b|\bc\s*(?:&|and)\s*h\b).*?\b(v\d{1,2})\b";

static OMEGA_SEMOGUE: Lazy<Regex> = Lazy::new(|| ci(OMEGA_SEMOGUE_RULE));
static ZENITH: Lazy<Regex> = Lazy::new(|| ci(ZENITH_RULE));
static DECLARATION: Lazy<Regex> = Lazy::new(|| ci(DECLARATION_RULE));
static CHISEL_HOUND: Lazy<Regex> = Lazy::new(|| ci(CHISEL_HOUND_RULE));

struct Defaults {
    fiber: Fiber,
    knot_size_mm: Option<f64>,
}

/// Fill attributes: catalog entry first, then the text, then brand defaults.
fn resolve(
    brand: &str,
    model: String,
    component: Component,
    text: &str,
    catalog: &CatalogIndex,
    defaults: Defaults,
) -> ProductIdentity {
    let entry = match component {
        Component::Knot => catalog.knot_entry(brand, &model),
        _ => catalog
            .brush_entry(brand, &model)
            .or_else(|| catalog.knot_entry(brand, &model)),
    };

    let (brand, model) = match entry {
        Some(entry) => (
            entry.brand.clone(),
            entry.model.clone().unwrap_or(model),
        ),
        None => (brand.to_string(), model),
    };

    ProductIdentity {
        brand: Some(brand),
        model: Some(model),
        fiber: entry
            .and_then(|e| e.fiber)
            .or_else(|| detect_fiber(text))
            .or(Some(defaults.fiber)),
        knot_size_mm: entry
            .and_then(|e| e.knot_size_mm)
            .or_else(|| parse_knot_size(text))
            .or(defaults.knot_size_mm),
    }
}

pub(super) fn omega_semogue(text: &str, component: Component, catalog: &CatalogIndex) -> Option<StrategyHit> {
    let caps = OMEGA_SEMOGUE.captures(text)?;
    let brand = if caps.get(1)?.as_str().eq_ignore_ascii_case("omega") {
        "Omega"
    } else {
        "Semogue"
    };
    let model = caps.get(2)?.as_str().to_string();

    Some(StrategyHit {
        identity: resolve(
            brand,
            model,
            component,
            text,
            catalog,
            Defaults {
                fiber: Fiber::Boar,
                knot_size_mm: None,
            },
        ),
        pattern: Some(OMEGA_SEMOGUE_RULE.to_string()),
    })
}

pub(super) fn zenith(text: &str, component: Component, catalog: &CatalogIndex) -> Option<StrategyHit> {
    let caps = ZENITH.captures(text)?;
    let model = caps.get(1)?.as_str().to_uppercase();

    Some(StrategyHit {
        identity: resolve(
            "Zenith",
            model,
            component,
            text,
            catalog,
            Defaults {
                fiber: Fiber::Boar,
                knot_size_mm: None,
            },
        ),
        pattern: Some(ZENITH_RULE.to_string()),
    })
}

pub(super) fn declaration_grooming(
    text: &str,
    component: Component,
    catalog: &CatalogIndex,
) -> Option<StrategyHit> {
    let caps = DECLARATION.captures(text)?;
    let model = caps.get(1)?.as_str().to_uppercase();

    Some(StrategyHit {
        identity: resolve(
            "Declaration Grooming",
            model,
            component,
            text,
            catalog,
            Defaults {
                fiber: Fiber::Badger,
                knot_size_mm: Some(26.0),
            },
        ),
        pattern: Some(DECLARATION_RULE.to_string()),
    })
}

pub(super) fn chisel_and_hound(
    text: &str,
    component: Component,
    catalog: &CatalogIndex,
) -> Option<StrategyHit> {
    let caps = CHISEL_HOUND.captures(text)?;
    let model = caps.get(1)?.as_str().to_uppercase();

    Some(StrategyHit {
        identity: resolve(
            "Chisel & Hound",
            model,
            component,
            text,
            catalog,
            Defaults {
                fiber: Fiber::Badger,
                knot_size_mm: Some(26.0),
            },
        ),
        pattern: Some(CHISEL_HOUND_RULE.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[test]
    fn test_omega_semogue_model_numbers() {
        let catalog = CatalogIndex::default();
        let hit = omega_semogue("Omega 10049", Component::Whole, &catalog).unwrap();
        assert_eq!(hit.identity.brand.as_deref(), Some("Omega"));
        assert_eq!(hit.identity.model.as_deref(), Some("10049"));
        assert_eq!(hit.identity.fiber, Some(Fiber::Boar));

        let hit = omega_semogue("semogue #1305", Component::Whole, &catalog).unwrap();
        assert_eq!(hit.identity.brand.as_deref(), Some("Semogue"));
        assert_eq!(hit.identity.model.as_deref(), Some("1305"));

        assert!(omega_semogue("Semogue Owners Club", Component::Whole, &catalog).is_none());
    }

    #[test]
    fn test_catalog_attributes_take_precedence() {
        let catalog = fixtures::catalog();
        let hit = omega_semogue("Semogue 610 badger?", Component::Whole, &catalog).unwrap();
        // catalog says boar, the text is ignored
        assert_eq!(hit.identity.fiber, Some(Fiber::Boar));
        assert_eq!(hit.identity.knot_size_mm, Some(21.0));
    }

    #[test]
    fn test_text_attributes_used_without_catalog_entry() {
        let catalog = CatalogIndex::default();
        let hit = zenith("Zenith 506U horsehair 28mm", Component::Whole, &catalog).unwrap();
        assert_eq!(hit.identity.model.as_deref(), Some("506U"));
        assert_eq!(hit.identity.fiber, Some(Fiber::Horse));
        assert_eq!(hit.identity.knot_size_mm, Some(28.0));
    }

    #[test]
    fn test_zenith_series_models() {
        let catalog = CatalogIndex::default();
        let hit = zenith("zenith b2 boar", Component::Whole, &catalog).unwrap();
        assert_eq!(hit.identity.model.as_deref(), Some("B2"));
        assert!(zenith("Zenith", Component::Whole, &catalog).is_none());
    }

    #[test]
    fn test_declaration_grooming_knot() {
        let catalog = fixtures::catalog();
        let hit = declaration_grooming("DG B15", Component::Knot, &catalog).unwrap();
        assert_eq!(
            hit.identity,
            ProductIdentity::new("Declaration Grooming", "B15")
                .with_fiber(Fiber::Badger)
                .with_knot_size(26.0)
        );

        let hit = declaration_grooming("Declaration Grooming B3", Component::Knot, &catalog).unwrap();
        assert_eq!(hit.identity.model.as_deref(), Some("B3"));
        assert_eq!(hit.identity.knot_size_mm, Some(26.0));
    }

    #[test]
    fn test_chisel_and_hound_knot() {
        let catalog = fixtures::catalog();
        let hit = chisel_and_hound("C&H V20", Component::Knot, &catalog).unwrap();
        assert_eq!(hit.identity.brand.as_deref(), Some("Chisel & Hound"));
        assert_eq!(hit.identity.model.as_deref(), Some("V20"));
        assert!(chisel_and_hound("C&H Zebra", Component::Knot, &catalog).is_none());
    }
}
