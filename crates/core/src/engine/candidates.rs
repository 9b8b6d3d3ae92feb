use rust_decimal::Decimal;

use crate::domain::catalog::{Catalog, HomePlan, Technology, TvPlan};
use crate::domain::recommendation::BundleCandidate;

/// Enumerates every structurally valid bundle for the given coverage and
/// demand: mobile only, mobile + each eligible home plan, mobile + each
/// eligible TV plan, and every home x TV pair.
///
/// The mobile-only baseline is always emitted, so a sparse catalog can never
/// produce an empty candidate set. Candidate count is `1 + H + T + H*T`;
/// catalogs hold tens of plans, so exhaustive enumeration is fine.
pub fn generate_candidates(
    catalog: &Catalog,
    available: &[Technology],
    needed_mbps: f64,
    needed_tv_hours: Decimal,
) -> Vec<BundleCandidate> {
    let home_plans = eligible_home_plans(&catalog.home_plans, available, needed_mbps);
    let tv_plans = eligible_tv_plans(&catalog.tv_plans, needed_tv_hours);

    let mut candidates =
        Vec::with_capacity(1 + home_plans.len() + tv_plans.len() + home_plans.len() * tv_plans.len());

    candidates.push(BundleCandidate {
        home_plan: None,
        tv_plan: None,
        label: "Mobile Only".to_string(),
    });

    for home in &home_plans {
        candidates.push(BundleCandidate {
            home_plan: Some((*home).clone()),
            tv_plan: None,
            label: format!("Mobile + {}", home.name),
        });
    }

    for tv in &tv_plans {
        candidates.push(BundleCandidate {
            home_plan: None,
            tv_plan: Some((*tv).clone()),
            label: format!("Mobile + {}", tv.name),
        });
    }

    for home in &home_plans {
        for tv in &tv_plans {
            candidates.push(BundleCandidate {
                home_plan: Some((*home).clone()),
                tv_plan: Some((*tv).clone()),
                label: format!("Triple: {} + {}", home.name, tv.name),
            });
        }
    }

    candidates
}

fn eligible_home_plans<'a>(
    plans: &'a [HomePlan],
    available: &[Technology],
    needed_mbps: f64,
) -> Vec<&'a HomePlan> {
    plans
        .iter()
        .filter(|plan| available.contains(&plan.tech) && plan.down_mbps as f64 >= needed_mbps)
        .collect()
}

fn eligible_tv_plans<'a>(plans: &'a [TvPlan], needed_tv_hours: Decimal) -> Vec<&'a TvPlan> {
    plans.iter().filter(|plan| plan.hd_hours_included >= needed_tv_hours).collect()
}
