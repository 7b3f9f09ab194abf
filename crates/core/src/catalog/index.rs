//! Compiled, read-only view of the catalog.

use std::cmp::Reverse;
use std::ops::Range;

use regex_lite::{Regex, RegexBuilder};
use serde::Serialize;
use tracing::warn;

use super::error::PatternError;
use super::types::{
    Category, CatalogSources, Fiber, HandleSection, ModelTable, ProductIdentity, RawBrandDefault,
};

/// A case-insensitive recognition pattern, compiled once.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    source: String,
    regex: Regex,
}

impl CompiledPattern {
    pub fn compile(source: &str) -> Result<Self, regex_lite::Error> {
        let regex = RegexBuilder::new(source).case_insensitive(true).build()?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Byte offset where the pattern first matches.
    pub fn find_offset(&self, text: &str) -> Option<usize> {
        self.regex.find(text).map(|m| m.start())
    }

    /// Byte range of the first match.
    pub fn find_span(&self, text: &str) -> Option<Range<usize>> {
        self.regex.find(text).map(|m| m.start()..m.end())
    }
}

/// One canonical product with its recognition patterns.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub brand: String,
    /// `None` for brand-level defaults.
    pub model: Option<String>,
    pub fiber: Option<Fiber>,
    pub knot_size_mm: Option<f64>,
    pub section: Option<HandleSection>,
    pub patterns: Vec<CompiledPattern>,
}

impl CatalogEntry {
    pub fn identity(&self) -> ProductIdentity {
        ProductIdentity {
            brand: Some(self.brand.clone()),
            model: self.model.clone(),
            fiber: self.fiber,
            knot_size_mm: self.knot_size_mm,
        }
    }

    fn is_named(&self, brand: &str, model: Option<&str>) -> bool {
        self.brand.eq_ignore_ascii_case(brand)
            && match (self.model.as_deref(), model) {
                (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
                (None, None) => true,
                _ => false,
            }
    }
}

/// A matched sweep entry and the pattern that recognised it.
#[derive(Debug, Clone, Copy)]
pub struct SweepHit<'a> {
    pub entry: &'a CatalogEntry,
    pub pattern: &'a str,
}

/// Entries plus a fixed evaluation order over all their patterns.
///
/// Order: handle section, then longest pattern first, then brand and model.
#[derive(Debug, Clone, Default)]
pub struct PatternSweep {
    entries: Vec<CatalogEntry>,
    order: Vec<(usize, usize)>,
}

impl PatternSweep {
    fn new(entries: Vec<CatalogEntry>) -> Self {
        let mut order: Vec<(usize, usize)> = entries
            .iter()
            .enumerate()
            .flat_map(|(e, entry)| (0..entry.patterns.len()).map(move |p| (e, p)))
            .collect();

        order.sort_by_key(|&(e, p)| {
            let entry = &entries[e];
            (
                entry.section,
                Reverse(entry.patterns[p].source().len()),
                entry.brand.clone(),
                entry.model.clone(),
                p,
            )
        });

        Self { entries, order }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry recognised in sweep order.
    pub fn first_match(&self, text: &str) -> Option<SweepHit<'_>> {
        self.order.iter().find_map(|&(e, p)| {
            let entry = &self.entries[e];
            let pattern = &entry.patterns[p];
            pattern.is_match(text).then_some(SweepHit {
                entry,
                pattern: pattern.source(),
            })
        })
    }

    /// Earliest byte offset at which any pattern matches.
    pub fn first_token(&self, text: &str) -> Option<usize> {
        self.entries
            .iter()
            .flat_map(|entry| entry.patterns.iter())
            .filter_map(|pattern| pattern.find_offset(text))
            .min()
    }

    /// Whether some pattern's match contains all of `span`.
    pub fn covers(&self, text: &str, span: Range<usize>) -> bool {
        self.entries
            .iter()
            .flat_map(|entry| entry.patterns.iter())
            .filter_map(|pattern| pattern.find_span(text))
            .any(|m| m.start <= span.start && m.end >= span.end)
    }

    /// Entry by name, case-insensitively.
    pub fn find(&self, brand: &str, model: Option<&str>) -> Option<&CatalogEntry> {
        self.entries.iter().find(|entry| entry.is_named(brand, model))
    }
}

/// Entry counts per sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub known_brushes: usize,
    pub other_brushes: usize,
    pub handle_models: usize,
    pub handle_makers: usize,
    pub known_knots: usize,
    pub other_knots: usize,
}

/// Outcome of compiling catalog sources.
///
/// Malformed entries are skipped and reported; everything else is indexed.
#[derive(Debug)]
pub struct CatalogBuild {
    pub index: CatalogIndex,
    pub errors: Vec<PatternError>,
}

/// Pre-compiled catalog shared by every strategy.
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    known_brushes: PatternSweep,
    other_brushes: PatternSweep,
    handle_models: PatternSweep,
    handle_makers: PatternSweep,
    known_knots: PatternSweep,
    other_knots: PatternSweep,
}

impl CatalogIndex {
    /// Compile every pattern in `sources`.
    pub fn build(sources: &CatalogSources) -> CatalogBuild {
        let mut errors = Vec::new();

        let (known_brushes, other_brushes) = {
            let mut compiler = EntryCompiler::new(&sources.files.brushes, Category::Brush, &mut errors);
            (
                compiler.model_table(&sources.brushes.known_brushes, None),
                compiler.brand_defaults(&sources.brushes.other_brushes, None),
            )
        };

        let (handle_models, handle_makers) = {
            let mut compiler = EntryCompiler::new(&sources.files.handles, Category::Handle, &mut errors);
            let mut models = Vec::new();
            let mut makers = Vec::new();
            for section in HandleSection::ALL {
                for (maker, raw) in sources.handles.section(section) {
                    let location = Location {
                        brand: maker,
                        model: None,
                        section: Some(section),
                        field: None,
                    };
                    if !raw.patterns.is_empty() {
                        makers.extend(compiler.entry(location, &raw.patterns, None, None));
                    }
                    for (model, raw_model) in &raw.models {
                        let location = Location {
                            model: Some(model.as_str()),
                            ..location
                        };
                        models.extend(compiler.entry(location, &raw_model.patterns, None, None));
                    }
                }
            }
            (models, makers)
        };

        let (known_knots, other_knots) = {
            let mut compiler = EntryCompiler::new(&sources.files.knots, Category::Knot, &mut errors);
            (
                compiler.model_table(&sources.knots.known_knots, Some("known_knots")),
                compiler.brand_defaults(&sources.knots.other_knots, Some("other_knots")),
            )
        };

        for err in &errors {
            warn!("Skipping catalog entry: {}", err);
        }

        CatalogBuild {
            index: CatalogIndex {
                known_brushes: PatternSweep::new(known_brushes),
                other_brushes: PatternSweep::new(other_brushes),
                handle_models: PatternSweep::new(handle_models),
                handle_makers: PatternSweep::new(handle_makers),
                known_knots: PatternSweep::new(known_knots),
                other_knots: PatternSweep::new(other_knots),
            },
            errors,
        }
    }

    pub fn known_brushes(&self) -> &PatternSweep {
        &self.known_brushes
    }

    pub fn other_brushes(&self) -> &PatternSweep {
        &self.other_brushes
    }

    pub fn handle_models(&self) -> &PatternSweep {
        &self.handle_models
    }

    pub fn handle_makers(&self) -> &PatternSweep {
        &self.handle_makers
    }

    pub fn known_knots(&self) -> &PatternSweep {
        &self.known_knots
    }

    pub fn other_knots(&self) -> &PatternSweep {
        &self.other_knots
    }

    /// Complete brush by name.
    pub fn brush_entry(&self, brand: &str, model: &str) -> Option<&CatalogEntry> {
        self.known_brushes.find(brand, Some(model))
    }

    /// Knot by name.
    pub fn knot_entry(&self, brand: &str, model: &str) -> Option<&CatalogEntry> {
        self.known_knots.find(brand, Some(model))
    }

    /// Whether a known complete brush pattern matches across `span` of
    /// `text`, i.e. the span is part of the brush's own name.
    pub fn known_brush_covers(&self, text: &str, span: Range<usize>) -> bool {
        self.known_brushes.covers(text, span)
    }

    /// Earliest offset of a handle maker or handle model token.
    pub fn first_handle_token(&self, text: &str) -> Option<usize> {
        [
            self.handle_models.first_token(text),
            self.handle_makers.first_token(text),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    /// Earliest offset of a knot brand or model token.
    pub fn first_knot_token(&self, text: &str) -> Option<usize> {
        [
            self.known_knots.first_token(text),
            self.other_knots.first_token(text),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            known_brushes: self.known_brushes.len(),
            other_brushes: self.other_brushes.len(),
            handle_models: self.handle_models.len(),
            handle_makers: self.handle_makers.len(),
            known_knots: self.known_knots.len(),
            other_knots: self.other_knots.len(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Location<'a> {
    brand: &'a str,
    model: Option<&'a str>,
    section: Option<HandleSection>,
    field: Option<&'a str>,
}

struct EntryCompiler<'a> {
    file: &'a str,
    category: Category,
    errors: &'a mut Vec<PatternError>,
}

impl<'a> EntryCompiler<'a> {
    fn new(file: &'a str, category: Category, errors: &'a mut Vec<PatternError>) -> Self {
        Self {
            file,
            category,
            errors,
        }
    }

    fn model_table(&mut self, table: &ModelTable, field: Option<&str>) -> Vec<CatalogEntry> {
        let mut entries = Vec::new();
        for (brand, models) in table {
            for (model, raw) in models {
                let location = Location {
                    brand,
                    model: Some(model.as_str()),
                    section: None,
                    field,
                };
                entries.extend(self.entry(location, &raw.patterns, raw.fiber, raw.knot_size_mm));
            }
        }
        entries
    }

    fn brand_defaults(
        &mut self,
        table: &std::collections::BTreeMap<String, RawBrandDefault>,
        field: Option<&str>,
    ) -> Vec<CatalogEntry> {
        table
            .iter()
            .filter_map(|(brand, raw)| {
                let location = Location {
                    brand,
                    model: None,
                    section: None,
                    field,
                };
                self.entry(location, &raw.patterns, raw.default_fiber, raw.knot_size_mm)
            })
            .collect()
    }

    /// Compile one entry; `None` if any of its patterns is malformed.
    fn entry(
        &mut self,
        location: Location<'_>,
        patterns: &[String],
        fiber: Option<Fiber>,
        knot_size_mm: Option<f64>,
    ) -> Option<CatalogEntry> {
        let mut compiled = Vec::with_capacity(patterns.len());
        let mut malformed = false;

        for pattern in patterns {
            match CompiledPattern::compile(pattern) {
                Ok(p) => compiled.push(p),
                Err(e) => {
                    malformed = true;
                    self.errors.push(PatternError {
                        file: self.file.to_string(),
                        category: self.category,
                        brand: location.brand.to_string(),
                        model: location.model.map(str::to_string),
                        section: location.section.map(|s| s.as_str().to_string()),
                        field: location.field.map(str::to_string),
                        pattern: pattern.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }

        if malformed {
            return None;
        }

        Some(CatalogEntry {
            brand: location.brand.to_string(),
            model: location.model.map(str::to_string),
            fiber,
            knot_size_mm,
            section: location.section,
            patterns: compiled,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::types::{RawHandleMaker, RawHandleModel, RawModelEntry};

    fn model(patterns: &[&str]) -> RawModelEntry {
        RawModelEntry {
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
            fiber: None,
            knot_size_mm: None,
        }
    }

    #[test]
    fn test_sweep_prefers_longer_patterns() {
        let mut sources = CatalogSources::default();
        sources
            .brushes
            .known_brushes
            .entry("Simpson".to_string())
            .or_default()
            .insert("Chubby".to_string(), model(&["simpson"]));
        sources
            .brushes
            .known_brushes
            .entry("Simpson".to_string())
            .or_default()
            .insert("Chubby 2".to_string(), model(&["simpson.*chubby\\s*2"]));

        let build = CatalogIndex::build(&sources);
        assert!(build.errors.is_empty());

        let hit = build
            .index
            .known_brushes()
            .first_match("Simpson Chubby 2 Best")
            .unwrap();
        assert_eq!(hit.entry.model.as_deref(), Some("Chubby 2"));
        assert_eq!(hit.pattern, "simpson.*chubby\\s*2");
    }

    #[test]
    fn test_patterns_are_case_insensitive() {
        let pattern = CompiledPattern::compile("semogue.*610").unwrap();
        assert!(pattern.is_match("SEMOGUE 610"));
        assert_eq!(pattern.find_offset("my Semogue 610"), Some(3));
    }

    #[test]
    fn test_malformed_patterns_are_all_reported_and_skipped() {
        let mut sources = CatalogSources::default();
        sources
            .knots
            .known_knots
            .entry("Declaration Grooming".to_string())
            .or_default()
            .insert("B15".to_string(), model(&["b15("]));
        sources
            .knots
            .known_knots
            .entry("Declaration Grooming".to_string())
            .or_default()
            .insert("B14".to_string(), model(&["dg.*b14"]));
        let mut maker = RawHandleMaker::default();
        maker.models.insert(
            "Zebra".to_string(),
            RawHandleModel {
                patterns: vec!["[zebra".to_string()],
            },
        );
        sources
            .handles
            .artisan_handles
            .insert("Chisel & Hound".to_string(), maker);

        let build = CatalogIndex::build(&sources);
        assert_eq!(build.errors.len(), 2);

        let handle_err = build
            .errors
            .iter()
            .find(|e| e.category == Category::Handle)
            .unwrap();
        assert_eq!(handle_err.file, "handles.toml");
        assert_eq!(handle_err.brand, "Chisel & Hound");
        assert_eq!(handle_err.model.as_deref(), Some("Zebra"));
        assert_eq!(handle_err.section.as_deref(), Some("artisan_handles"));
        assert!(handle_err.field.is_none());

        let knot_err = build
            .errors
            .iter()
            .find(|e| e.category == Category::Knot)
            .unwrap();
        assert_eq!(knot_err.field.as_deref(), Some("known_knots"));
        assert_eq!(knot_err.model.as_deref(), Some("B15"));
        assert!(!knot_err.message.is_empty());

        // the well-formed sibling survives
        assert!(build.index.knot_entry("Declaration Grooming", "B14").is_some());
        assert!(build.index.knot_entry("Declaration Grooming", "B15").is_none());
        assert!(build.index.handle_models().is_empty());
    }

    #[test]
    fn test_handle_sections_swept_in_order() {
        let mut sources = CatalogSources::default();
        for (section, maker) in [
            (HandleSection::OtherHandles, "Generic Turner"),
            (HandleSection::ArtisanHandles, "Dogwood"),
        ] {
            let mut raw = RawHandleMaker::default();
            raw.models.insert(
                "Burl".to_string(),
                RawHandleModel {
                    patterns: vec!["burl".to_string()],
                },
            );
            let target = match section {
                HandleSection::OtherHandles => &mut sources.handles.other_handles,
                _ => &mut sources.handles.artisan_handles,
            };
            target.insert(maker.to_string(), raw);
        }

        let build = CatalogIndex::build(&sources);
        let hit = build.index.handle_models().first_match("burl handle").unwrap();
        assert_eq!(hit.entry.brand, "Dogwood");
        assert_eq!(hit.entry.section, Some(HandleSection::ArtisanHandles));
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let mut sources = CatalogSources::default();
        sources
            .knots
            .known_knots
            .entry("Declaration Grooming".to_string())
            .or_default()
            .insert("B15".to_string(), model(&[]));
        let build = CatalogIndex::build(&sources);
        assert!(build.index.knot_entry("declaration grooming", "b15").is_some());
        assert!(build.index.first_knot_token("anything").is_none());
    }

    #[test]
    fn test_known_brush_covers_only_its_own_span() {
        let mut sources = CatalogSources::default();
        sources
            .brushes
            .known_brushes
            .entry("Simpson".to_string())
            .or_default()
            .insert("Duke 3 with Manchurian".to_string(), model(&[r"duke\s*3\s+with\s+manchurian"]));
        sources
            .brushes
            .known_brushes
            .entry("Semogue".to_string())
            .or_default()
            .insert("610".to_string(), model(&["semogue.*610"]));
        let index = CatalogIndex::build(&sources).index;

        let text = "Simpson Duke 3 with Manchurian";
        let with = text.find(" with ").unwrap();
        assert!(index.known_brush_covers(text, with..with + 6));

        let text = "Dogwood handle w/ Semogue 610 knot";
        let sep = text.find(" w/ ").unwrap();
        assert!(!index.known_brush_covers(text, sep..sep + 4));
    }
}
