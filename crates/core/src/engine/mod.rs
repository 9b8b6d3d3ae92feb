pub mod candidates;
pub mod coverage;
pub mod demand;
pub mod matching;
pub mod pricing;
pub mod ranking;

use crate::domain::catalog::Catalog;
use crate::domain::coverage::Coverage;
use crate::domain::household::HouseholdLine;
use crate::domain::recommendation::RecommendationResult;
use crate::errors::DomainError;

/// Number of ranked candidates returned to the caller.
pub const TOP_CANDIDATES: usize = 3;

/// Runs the full recommendation pipeline over one immutable catalog/coverage
/// snapshot: coverage resolution, demand sizing, candidate enumeration, line
/// matching, pricing, and ranking.
///
/// Pure computation; no I/O and no shared state, so concurrent invocations
/// need no locking as long as the snapshot is not mutated underneath them.
pub fn recommend(
    catalog: &Catalog,
    coverage: &Coverage,
    lines: &[HouseholdLine],
) -> Result<RecommendationResult, DomainError> {
    let technologies = coverage::available_technologies(coverage);
    let needed_mbps = demand::required_home_mbps(lines);
    let needed_tv_hours = demand::required_tv_hours(lines);

    let candidates =
        candidates::generate_candidates(catalog, &technologies, needed_mbps, needed_tv_hours);
    let assignments = matching::match_lines(lines, &catalog.mobile_plans)?;

    let priced = candidates
        .into_iter()
        .map(|candidate| pricing::price_candidate(candidate, &assignments))
        .collect();

    Ok(RecommendationResult { candidates: ranking::top_candidates(priced, TOP_CANDIDATES) })
}
