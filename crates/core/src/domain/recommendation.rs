use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::catalog::{HomePlan, MobilePlan, TvPlan};
use crate::domain::household::HouseholdLine;

/// A structurally valid bundle shape. Mobile service is always present; home
/// internet and TV are optional attachments. Candidates are generated fresh
/// per request and never persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BundleCandidate {
    pub home_plan: Option<HomePlan>,
    pub tv_plan: Option<TvPlan>,
    pub label: String,
}

/// A household line bound to the mobile plan chosen for it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineAssignment {
    pub line: HouseholdLine,
    pub plan: MobilePlan,
    pub line_cost: Decimal,
    pub overage_gb: Decimal,
    pub overage_min: Decimal,
}

/// Stage-by-stage totals for one priced candidate. `mobile_total` here is
/// the mobile subtotal after the multi-line discount.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub mobile_total: Decimal,
    pub home_total: Decimal,
    pub tv_total: Decimal,
    pub subtotal: Decimal,
    pub bundle_discount: Decimal,
    pub bundle_discount_rate: Decimal,
    pub grand_total: Decimal,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricedCandidate {
    pub candidate: BundleCandidate,
    pub line_assignments: Vec<LineAssignment>,
    /// Mobile subtotal before any discount.
    pub mobile_total: Decimal,
    pub line_discount: Decimal,
    pub home_cost: Decimal,
    pub tv_cost: Decimal,
    pub bundle_discount: Decimal,
    pub bundle_discount_rate: Decimal,
    pub grand_total: Decimal,
    pub total_savings: Decimal,
    pub reasoning: String,
    pub breakdown: PriceBreakdown,
}

/// The cheapest viable bundles, ascending by grand total.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub candidates: Vec<PricedCandidate>,
}
