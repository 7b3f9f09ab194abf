use super::types::MatchCandidate;

/// Lowest score wins; equal scores go to the earlier registration.
pub fn select(candidates: Vec<MatchCandidate>) -> Option<MatchCandidate> {
    candidates.into_iter().min_by_key(|c| (c.score, c.rank))
}
