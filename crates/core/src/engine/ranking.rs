use crate::domain::recommendation::PricedCandidate;

/// Cheapest-first ordering, truncated to `limit` (fewer if fewer exist).
///
/// `sort_by` is stable, so candidates with equal grand totals keep their
/// generation order rather than being reshuffled.
pub fn top_candidates(
    mut candidates: Vec<PricedCandidate>,
    limit: usize,
) -> Vec<PricedCandidate> {
    candidates.sort_by(|a, b| a.grand_total.cmp(&b.grand_total));
    candidates.truncate(limit);
    candidates
}
