use crate::models::Candidate;

/// The one selection rule every extractor shares: labeled candidates beat
/// context heuristics, which beat fallbacks. Within a rank the caller's
/// ordering is preserved and the first candidate wins, so extractors encode
/// "document order" or "proximity order" simply by the order they push.
pub fn select_preferred<T>(candidates: Vec<Candidate<T>>) -> Option<Candidate<T>> {
    candidates.into_iter().min_by_key(|c| c.source.rank())
}
