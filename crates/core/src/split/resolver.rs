//! Composite detection and handle/knot partitioning.

use regex_lite::{Regex, RegexBuilder};
use tracing::debug;

use super::rules::{SplitRules, SplitRulesError};
use crate::catalog::{fiber_token_offset, knot_size_offset, CatalogIndex};
use crate::matcher::UserIntent;

/// Result of composite detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitOutcome {
    NotComposite,
    Composite(CompositeSplit),
}

/// A composite description cut into its handle and knot parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeSplit {
    pub handle_text: String,
    pub knot_text: String,
    pub user_intent: UserIntent,
    /// Name of the separator rule that fired.
    pub separator: String,
}

#[derive(Debug, Clone)]
struct CompiledSeparator {
    name: String,
    regex: Regex,
    requires_recognition: bool,
}

/// Which component a piece of text shows evidence of.
#[derive(Debug, Clone, Copy, Default)]
struct Evidence {
    handle: Option<usize>,
    knot: Option<usize>,
}

/// Compiled [`SplitRules`].
#[derive(Debug, Clone)]
pub struct SplitResolver {
    separators: Vec<CompiledSeparator>,
    knot_indicators: Vec<Regex>,
    handle_indicators: Vec<Regex>,
}

fn compile(kind: &'static str, name: &str, pattern: &str) -> Result<Regex, SplitRulesError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| SplitRulesError::InvalidPattern {
            kind,
            name: name.to_string(),
            pattern: pattern.to_string(),
            message: e.to_string(),
        })
}

impl SplitResolver {
    pub fn new(rules: &SplitRules) -> Result<Self, SplitRulesError> {
        if rules.separators.is_empty() {
            return Err(SplitRulesError::NoSeparators);
        }

        let separators = rules
            .separators
            .iter()
            .map(|rule| {
                Ok(CompiledSeparator {
                    name: rule.name.clone(),
                    regex: compile("separator", &rule.name, &rule.pattern)?,
                    requires_recognition: rule.requires_recognition,
                })
            })
            .collect::<Result<Vec<_>, SplitRulesError>>()?;

        let knot_indicators = rules
            .knot_indicators
            .iter()
            .map(|p| compile("knot indicator", p, p))
            .collect::<Result<Vec<_>, _>>()?;

        let handle_indicators = rules
            .handle_indicators
            .iter()
            .map(|p| compile("handle indicator", p, p))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            separators,
            knot_indicators,
            handle_indicators,
        })
    }

    /// Decide whether `text` describes a handle + knot composite.
    pub fn split(&self, text: &str, catalog: &CatalogIndex) -> SplitOutcome {
        for separator in &self.separators {
            for m in separator.regex.find_iter(text) {
                if catalog.known_brush_covers(text, m.start()..m.end()) {
                    debug!(
                        "'{}' separator inside a known brush name in '{}'",
                        separator.name, text
                    );
                    continue;
                }

                let left = text[..m.start()].trim();
                let right = text[m.end()..].trim();
                if left.is_empty() || right.is_empty() {
                    continue;
                }

                let left_ev = self.evidence(left, catalog);
                let right_ev = self.evidence(right, catalog);

                let handle_first =
                    u8::from(left_ev.handle.is_some()) + u8::from(right_ev.knot.is_some());
                let knot_first = u8::from(left_ev.knot.is_some()) + u8::from(right_ev.handle.is_some());
                let required = if separator.requires_recognition { 2 } else { 1 };
                if handle_first.max(knot_first) < required {
                    continue;
                }

                let tail = &text[m.end()..];
                let right_start = m.end() + (tail.len() - tail.trim_start().len());
                let knot_left = knot_first > handle_first;
                let (handle_text, handle_pos, knot_text, knot_pos) = if knot_left {
                    (
                        right,
                        right_ev.handle.map(|p| right_start + p),
                        left,
                        left_ev.knot,
                    )
                } else {
                    (
                        left,
                        left_ev.handle,
                        right,
                        right_ev.knot.map(|p| right_start + p),
                    )
                };

                let user_intent = match (knot_pos, handle_pos) {
                    (Some(knot), Some(handle)) => intent_from_positions(knot, handle),
                    // only the knot is recognised: it leads if it was written first
                    (Some(_), None) if knot_left => UserIntent::KnotPrimary,
                    _ => UserIntent::HandlePrimary,
                };
                debug!(
                    "Split '{}' on '{}': handle='{}', knot='{}', intent={}",
                    text, separator.name, handle_text, knot_text, user_intent
                );

                return SplitOutcome::Composite(CompositeSplit {
                    handle_text: handle_text.to_string(),
                    knot_text: knot_text.to_string(),
                    user_intent,
                    separator: separator.name.clone(),
                });
            }
        }

        SplitOutcome::NotComposite
    }

    /// Surface-order intent for `text`.
    ///
    /// Uses the split when there is one; otherwise compares the first knot
    /// token with the first handle token in the whole text. Defaults to
    /// [`UserIntent::HandlePrimary`].
    pub fn infer_intent(&self, text: &str, catalog: &CatalogIndex) -> UserIntent {
        if let SplitOutcome::Composite(split) = self.split(text, catalog) {
            return split.user_intent;
        }

        let evidence = self.evidence(text, catalog);
        match (evidence.knot, evidence.handle) {
            (Some(knot), Some(handle)) => intent_from_positions(knot, handle),
            _ => UserIntent::HandlePrimary,
        }
    }

    fn evidence(&self, text: &str, catalog: &CatalogIndex) -> Evidence {
        let handle = [catalog.first_handle_token(text), first_offset(&self.handle_indicators, text)]
            .into_iter()
            .flatten()
            .min();

        let knot = [
            catalog.first_knot_token(text),
            first_offset(&self.knot_indicators, text),
            fiber_token_offset(text),
            knot_size_offset(text),
        ]
        .into_iter()
        .flatten()
        .min();

        Evidence { handle, knot }
    }
}

fn first_offset(patterns: &[Regex], text: &str) -> Option<usize> {
    patterns
        .iter()
        .filter_map(|re| re.find(text).map(|m| m.start()))
        .min()
}

fn intent_from_positions(knot_pos: usize, handle_pos: usize) -> UserIntent {
    if knot_pos < handle_pos {
        UserIntent::KnotPrimary
    } else {
        UserIntent::HandlePrimary
    }
}
