//! Match result types handed to downstream enrichment.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::ProductIdentity;

/// `matched_by` value for results served from the correct-match store.
pub const MATCHED_BY_OVERRIDE: &str = "override";

/// `matched_by` value for handle/knot composites.
pub const MATCHED_BY_COMPOSITE: &str = "composite";

/// Which sub-component the author named first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserIntent {
    HandlePrimary,
    KnotPrimary,
}

impl fmt::Display for UserIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UserIntent::HandlePrimary => "handle_primary",
            UserIntent::KnotPrimary => "knot_primary",
        })
    }
}

/// How a result was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    /// Served from the correct-match store.
    Exact,
    /// Produced by a matching strategy.
    Strategy,
    /// Nothing matched; left for manual review.
    Unmatched,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::Exact => "exact",
            MatchType::Strategy => "strategy",
            MatchType::Unmatched => "unmatched",
        }
    }
}

/// A resolved handle or knot inside a composite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentMatch {
    #[serde(flatten)]
    pub identity: ProductIdentity,
    /// Substring of the original text this component was resolved from.
    pub source_text: String,
    pub match_type: MatchType,
    pub matched_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

/// Handle + knot result.
///
/// `brand` and `model` stay `None`: naming a composite product is left to
/// reporting, which has its own rules for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeMatch {
    pub brand: Option<String>,
    pub model: Option<String>,
    pub handle: Option<ComponentMatch>,
    pub knot: Option<ComponentMatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_intent: Option<UserIntent>,
}

impl CompositeMatch {
    pub fn new(
        handle: Option<ComponentMatch>,
        knot: Option<ComponentMatch>,
        user_intent: Option<UserIntent>,
    ) -> Self {
        Self {
            brand: None,
            model: None,
            handle,
            knot,
            user_intent,
        }
    }
}

/// Shape of a successful match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Matched {
    Complete(ProductIdentity),
    Composite(CompositeMatch),
}

/// The engine's output for one input string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub original: String,
    pub normalized: String,
    pub matched: Option<Matched>,
    pub match_type: MatchType,
    /// Winning strategy id, `"override"`, or `"composite"`.
    pub matched_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl MatchResult {
    pub fn unmatched(original: &str, normalized: &str) -> Self {
        Self {
            original: original.to_string(),
            normalized: normalized.to_string(),
            matched: None,
            match_type: MatchType::Unmatched,
            matched_by: None,
            pattern: None,
        }
    }

    pub fn is_matched(&self) -> bool {
        self.matched.is_some()
    }

    pub fn complete(&self) -> Option<&ProductIdentity> {
        match &self.matched {
            Some(Matched::Complete(identity)) => Some(identity),
            _ => None,
        }
    }

    pub fn composite(&self) -> Option<&CompositeMatch> {
        match &self.matched {
            Some(Matched::Composite(composite)) => Some(composite),
            _ => None,
        }
    }

    pub fn user_intent(&self) -> Option<UserIntent> {
        self.composite().and_then(|c| c.user_intent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Fiber;

    fn knot() -> ComponentMatch {
        ComponentMatch {
            identity: ProductIdentity::new("Declaration Grooming", "B15")
                .with_fiber(Fiber::Badger)
                .with_knot_size(26.0),
            source_text: "DG B15".to_string(),
            match_type: MatchType::Strategy,
            matched_by: "known_knot".to_string(),
            pattern: None,
        }
    }

    #[test]
    fn test_composite_serialization() {
        let result = MatchResult {
            original: "DG B15 w/ C&H Zebra".to_string(),
            normalized: "dg b15 w/ c&h zebra".to_string(),
            matched: Some(Matched::Composite(CompositeMatch::new(
                None,
                Some(knot()),
                Some(UserIntent::KnotPrimary),
            ))),
            match_type: MatchType::Strategy,
            matched_by: Some(MATCHED_BY_COMPOSITE.to_string()),
            pattern: None,
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["match_type"], "strategy");
        assert_eq!(json["matched"]["shape"], "composite");
        assert!(json["matched"]["brand"].is_null());
        assert!(json["matched"]["model"].is_null());
        assert!(json["matched"]["handle"].is_null());
        assert_eq!(json["matched"]["knot"]["brand"], "Declaration Grooming");
        assert_eq!(json["matched"]["knot"]["fiber"], "Badger");
        assert_eq!(json["matched"]["knot"]["knot_size_mm"], 26.0);
        assert_eq!(json["matched"]["knot"]["source_text"], "DG B15");
        assert_eq!(json["matched"]["user_intent"], "knot_primary");

        let parsed: MatchResult = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, result);
    }

    #[test]
    fn test_unmatched_serialization() {
        let result = MatchResult::unmatched("???", "???");
        let json = serde_json::to_value(&result).unwrap();
        assert!(json["matched"].is_null());
        assert_eq!(json["match_type"], "unmatched");
        assert!(result.user_intent().is_none());
        assert!(!result.is_matched());
    }
}
