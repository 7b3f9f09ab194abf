//! Merging resolved components into the final [`MatchResult`].

use super::types::{
    ComponentMatch, CompositeMatch, MatchResult, MatchType, Matched, UserIntent,
    MATCHED_BY_COMPOSITE,
};

/// Build the output record.
///
/// A whole-product match wins outright. Otherwise any resolved handle or
/// knot yields a composite; a composite is `Exact` only when every resolved
/// half came from the correct-match store. Nothing resolved is `Unmatched`.
pub fn assemble(
    original: &str,
    normalized: &str,
    whole: Option<ComponentMatch>,
    handle: Option<ComponentMatch>,
    knot: Option<ComponentMatch>,
    user_intent: Option<UserIntent>,
) -> MatchResult {
    if let Some(whole) = whole {
        return MatchResult {
            original: original.to_string(),
            normalized: normalized.to_string(),
            matched: Some(Matched::Complete(whole.identity)),
            match_type: whole.match_type,
            matched_by: Some(whole.matched_by),
            pattern: whole.pattern,
        };
    }

    if handle.is_none() && knot.is_none() {
        return MatchResult::unmatched(original, normalized);
    }

    let all_exact = handle
        .iter()
        .chain(knot.iter())
        .all(|c| c.match_type == MatchType::Exact);

    MatchResult {
        original: original.to_string(),
        normalized: normalized.to_string(),
        matched: Some(Matched::Composite(CompositeMatch::new(
            handle,
            knot,
            user_intent,
        ))),
        match_type: if all_exact {
            MatchType::Exact
        } else {
            MatchType::Strategy
        },
        matched_by: Some(MATCHED_BY_COMPOSITE.to_string()),
        pattern: None,
    }
}
