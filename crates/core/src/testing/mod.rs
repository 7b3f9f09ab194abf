//! Testing utilities: a small, realistic catalog and helpers around it.
//!
//! # Example
//!
//! ```rust,ignore
//! use brushmatch_core::testing::fixtures;
//!
//! let matcher = fixtures::matcher(Default::default());
//! let result = matcher.match_brush("DG B15 w/ C&H Zebra");
//! ```

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::collections::BTreeMap;

    use crate::catalog::{
        BrushCatalogFile, CatalogIndex, CatalogSources, Fiber, HandleCatalogFile,
        KnotCatalogFile, ModelTable, RawBrandDefault, RawHandleMaker, RawHandleModel,
        RawModelEntry,
    };
    use crate::matcher::BrushMatcher;
    use crate::overrides::{CorrectMatchFile, CorrectMatchStore, RawOverride};
    use crate::snapshot::SnapshotInputs;
    use crate::split::{SplitResolver, SplitRules};
    use crate::strategy::Registries;

    fn patterns(list: &[&str]) -> Vec<String> {
        list.iter().map(|p| p.to_string()).collect()
    }

    /// A `known_*` catalog entry.
    pub fn model_entry(list: &[&str], fiber: Option<Fiber>, knot_size_mm: Option<f64>) -> RawModelEntry {
        RawModelEntry {
            patterns: patterns(list),
            fiber,
            knot_size_mm,
        }
    }

    /// An `other_*` brand default.
    pub fn brand_default(list: &[&str], default_fiber: Option<Fiber>) -> RawBrandDefault {
        RawBrandDefault {
            patterns: patterns(list),
            default_fiber,
            knot_size_mm: None,
        }
    }

    fn table(entries: Vec<(&str, &str, RawModelEntry)>) -> ModelTable {
        let mut table = ModelTable::new();
        for (brand, model, entry) in entries {
            table
                .entry(brand.to_string())
                .or_default()
                .insert(model.to_string(), entry);
        }
        table
    }

    pub fn brushes() -> BrushCatalogFile {
        BrushCatalogFile {
            known_brushes: table(vec![
                (
                    "Simpson",
                    "Chubby 2",
                    model_entry(&[r"simp(?:son)?.*chubby\s*2"], Some(Fiber::Badger), Some(27.0)),
                ),
                (
                    "Semogue",
                    "610",
                    model_entry(&[r"semogue.*610"], Some(Fiber::Boar), Some(21.0)),
                ),
            ]),
            other_brushes: BTreeMap::from([
                ("Omega".to_string(), brand_default(&["omega"], Some(Fiber::Boar))),
                ("Elite".to_string(), brand_default(&[r"\belite\b"], Some(Fiber::Badger))),
            ]),
        }
    }

    pub fn handles() -> HandleCatalogFile {
        let chisel = RawHandleMaker {
            patterns: patterns(&[r"chisel\s*(?:&|and)\s*hound", r"\bc\s*(?:&|and)\s*h\b"]),
            models: BTreeMap::from([(
                "Zebra".to_string(),
                RawHandleModel {
                    patterns: patterns(&[
                        r"(?:chisel\s*(?:&|and)\s*hound|\bc\s*(?:&|and)\s*h\b).*zebra",
                    ]),
                },
            )]),
        };
        let dogwood = RawHandleMaker {
            patterns: patterns(&[r"\bdogwood\b"]),
            models: BTreeMap::new(),
        };

        HandleCatalogFile {
            artisan_handles: BTreeMap::from([
                ("Chisel & Hound".to_string(), chisel),
                ("Dogwood Handcrafts".to_string(), dogwood),
            ]),
            ..HandleCatalogFile::default()
        }
    }

    pub fn knots() -> KnotCatalogFile {
        KnotCatalogFile {
            known_knots: table(vec![
                (
                    "Declaration Grooming",
                    "B15",
                    model_entry(
                        &[r"(?:\bdg\b|declaration).*\bb15\b"],
                        Some(Fiber::Badger),
                        Some(26.0),
                    ),
                ),
                (
                    "Chisel & Hound",
                    "V20",
                    model_entry(
                        &[r"(?:\bc\s*(?:&|and)\s*h\b|chisel).*\bv20\b"],
                        Some(Fiber::Badger),
                        Some(26.0),
                    ),
                ),
            ]),
            other_knots: BTreeMap::from([
                ("Omega".to_string(), brand_default(&["omega"], Some(Fiber::Boar))),
                ("Semogue".to_string(), brand_default(&["semogue"], Some(Fiber::Boar))),
            ]),
        }
    }

    pub fn catalog_sources() -> CatalogSources {
        CatalogSources {
            brushes: brushes(),
            handles: handles(),
            knots: knots(),
            ..CatalogSources::default()
        }
    }

    /// The fixture catalog, compiled. It has no malformed patterns.
    pub fn catalog() -> CatalogIndex {
        CatalogIndex::build(&catalog_sources()).index
    }

    /// A complete-brush override.
    pub fn product_override(strings: &[&str], brand: &str, model: &str) -> RawOverride {
        RawOverride {
            strings: patterns(strings),
            brand: Some(brand.to_string()),
            model: Some(model.to_string()),
            ..RawOverride::default()
        }
    }

    /// A small correct-match file: one complete brush, one knot.
    pub fn correct_matches() -> CorrectMatchFile {
        CorrectMatchFile {
            brush: vec![product_override(&["Simpson Chubby II"], "Simpson", "Chubby 2")],
            knot: vec![product_override(&["Declaration B15 knot"], "Declaration Grooming", "B15")],
            ..CorrectMatchFile::default()
        }
    }

    pub fn snapshot_inputs() -> SnapshotInputs {
        SnapshotInputs {
            catalog: catalog_sources(),
            correct_matches: correct_matches(),
        }
    }

    /// Matcher over the fixture catalog with default rules and `overrides`.
    pub fn matcher(overrides: CorrectMatchStore) -> BrushMatcher {
        let splitter = SplitResolver::new(&SplitRules::default())
            .expect("default split rules compile");
        BrushMatcher::new(catalog(), overrides, Registries::default(), splitter)
    }
}
