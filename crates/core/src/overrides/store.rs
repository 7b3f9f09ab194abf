//! Read-only correct-match store with copy-on-promote semantics.

use std::collections::HashMap;

use tracing::debug;

use super::types::{
    CorrectMatchFile, OverrideCanonical, OverrideEntry, OverrideError, OverrideKind, RawOverride,
};
use crate::matcher::{MatchResult, Matched, UserIntent};
use crate::normalize::normalize;

/// Confirmed results keyed by normalized text, one map per partition.
#[derive(Debug, Clone, Default)]
pub struct CorrectMatchStore {
    complete: HashMap<String, OverrideEntry>,
    handle: HashMap<String, OverrideEntry>,
    knot: HashMap<String, OverrideEntry>,
}

impl CorrectMatchStore {
    pub fn builder() -> CorrectMatchStoreBuilder {
        CorrectMatchStoreBuilder::default()
    }

    /// Build from a parsed file.
    ///
    /// Composite overrides recorded without a `user_intent` get one from
    /// `infer_intent`, called with the original string.
    pub fn from_file<F>(file: &CorrectMatchFile, infer_intent: F) -> Result<Self, Vec<OverrideError>>
    where
        F: Fn(&str) -> UserIntent,
    {
        let mut builder = Self::builder();
        builder.add_raw(OverrideKind::Complete, &file.brush, &infer_intent);
        builder.add_raw(OverrideKind::Handle, &file.handle, &infer_intent);
        builder.add_raw(OverrideKind::Knot, &file.knot, &infer_intent);
        builder.build()
    }

    /// Look up an already-normalized key.
    pub fn lookup(&self, key: &str, kind: OverrideKind) -> Option<&OverrideEntry> {
        self.partition(kind).get(key)
    }

    /// Normalize `text` and look it up.
    pub fn lookup_text(&self, text: &str, kind: OverrideKind) -> Option<&OverrideEntry> {
        self.lookup(&normalize(text), kind)
    }

    pub fn len(&self, kind: OverrideKind) -> usize {
        self.partition(kind).len()
    }

    /// Entries across all partitions.
    pub fn total_len(&self) -> usize {
        self.complete.len() + self.handle.len() + self.knot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.complete.is_empty() && self.handle.is_empty() && self.knot.is_empty()
    }

    /// Entries of one partition, sorted by key.
    pub fn entries(&self, kind: OverrideKind) -> Vec<&OverrideEntry> {
        let mut entries: Vec<_> = self.partition(kind).values().collect();
        entries.sort_by(|a, b| a.normalized_key.cmp(&b.normalized_key));
        entries
    }

    /// A copy of this store with `result` confirmed as the complete-kind
    /// override for `original`.
    ///
    /// A composite keeps its `user_intent`, so re-matching `original`
    /// through the exact path reports the same intent.
    pub fn promote(&self, original: &str, result: &MatchResult) -> Result<Self, OverrideError> {
        let not_promotable = |reason: &str| OverrideError::NotPromotable {
            original: original.to_string(),
            reason: reason.to_string(),
        };

        let normalized_key = normalize(original);
        if normalized_key.is_empty() {
            return Err(not_promotable("text normalizes to an empty key"));
        }

        let (canonical, user_intent) = match &result.matched {
            None => return Err(not_promotable("result is unmatched")),
            Some(Matched::Complete(identity)) => (OverrideCanonical::Product(identity.clone()), None),
            Some(Matched::Composite(composite)) => match (&composite.handle, &composite.knot) {
                (Some(handle), Some(knot)) => (
                    OverrideCanonical::Composite {
                        handle: handle.identity.clone(),
                        knot: knot.identity.clone(),
                    },
                    composite.user_intent,
                ),
                _ => return Err(not_promotable("composite is missing its handle or knot")),
            },
        };

        let mut builder = CorrectMatchStoreBuilder {
            store: self.clone(),
            errors: Vec::new(),
        };
        builder.insert(OverrideEntry {
            normalized_key,
            kind: OverrideKind::Complete,
            canonical,
            user_intent,
        });

        builder
            .build()
            .map_err(|mut errors| errors.remove(0))
    }

    fn partition(&self, kind: OverrideKind) -> &HashMap<String, OverrideEntry> {
        match kind {
            OverrideKind::Complete => &self.complete,
            OverrideKind::Handle => &self.handle,
            OverrideKind::Knot => &self.knot,
        }
    }

    fn partition_mut(&mut self, kind: OverrideKind) -> &mut HashMap<String, OverrideEntry> {
        match kind {
            OverrideKind::Complete => &mut self.complete,
            OverrideKind::Handle => &mut self.handle,
            OverrideKind::Knot => &mut self.knot,
        }
    }
}

/// Accumulates entries and every conflict found while adding them.
#[derive(Debug, Default)]
pub struct CorrectMatchStoreBuilder {
    store: CorrectMatchStore,
    errors: Vec<OverrideError>,
}

impl CorrectMatchStoreBuilder {
    /// Add an entry.
    ///
    /// Re-adding an identical result is a no-op. A different result for an
    /// existing key is recorded as [`OverrideError::AmbiguousKey`].
    pub fn insert(&mut self, entry: OverrideEntry) -> &mut Self {
        let partition = self.store.partition_mut(entry.kind);

        match partition.get_mut(&entry.normalized_key) {
            None => {
                partition.insert(entry.normalized_key.clone(), entry);
            }
            Some(existing) => {
                let intents_conflict = matches!(
                    (existing.user_intent, entry.user_intent),
                    (Some(a), Some(b)) if a != b
                );
                if existing.canonical != entry.canonical || intents_conflict {
                    self.errors.push(OverrideError::AmbiguousKey {
                        kind: entry.kind,
                        key: entry.normalized_key.clone(),
                        existing: existing.canonical.describe(),
                        conflicting: entry.canonical.describe(),
                    });
                } else if existing.user_intent.is_none() {
                    existing.user_intent = entry.user_intent;
                } else {
                    debug!("Duplicate {} override for '{}'", entry.kind, entry.normalized_key);
                }
            }
        }

        self
    }

    fn add_raw<F>(&mut self, kind: OverrideKind, raws: &[RawOverride], infer_intent: &F)
    where
        F: Fn(&str) -> UserIntent,
    {
        for (index, raw) in raws.iter().enumerate() {
            let invalid = |reason: String| OverrideError::InvalidEntry {
                kind,
                index,
                reason,
            };

            let canonical = match raw.canonical(kind) {
                Ok(canonical) => canonical,
                Err(reason) => {
                    self.errors.push(invalid(reason));
                    continue;
                }
            };

            if raw.strings.is_empty() {
                self.errors.push(invalid("no strings listed".to_string()));
                continue;
            }

            let is_composite = matches!(canonical, OverrideCanonical::Composite { .. });
            for original in &raw.strings {
                let normalized_key = normalize(original);
                if normalized_key.is_empty() {
                    self.errors.push(invalid(format!(
                        "string {:?} normalizes to an empty key",
                        original
                    )));
                    continue;
                }

                let user_intent = if is_composite {
                    Some(raw.user_intent.unwrap_or_else(|| infer_intent(original)))
                } else {
                    None
                };

                self.insert(OverrideEntry {
                    normalized_key,
                    kind,
                    canonical: canonical.clone(),
                    user_intent,
                });
            }
        }
    }

    /// Finish, failing if any conflict or invalid entry was seen.
    pub fn build(self) -> Result<CorrectMatchStore, Vec<OverrideError>> {
        if self.errors.is_empty() {
            Ok(self.store)
        } else {
            Err(self.errors)
        }
    }
}
