use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Last-mile access technology at an address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Technology {
    Fiber,
    Vdsl,
    Fwa,
}

impl Technology {
    /// Fixed preference order: fiber > vdsl > fwa.
    pub const PRIORITY: [Technology; 3] = [Technology::Fiber, Technology::Vdsl, Technology::Fwa];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fiber => "fiber",
            Self::Vdsl => "vdsl",
            Self::Fwa => "fwa",
        }
    }
}

impl std::fmt::Display for Technology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Technology {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fiber" => Ok(Self::Fiber),
            "vdsl" => Ok(Self::Vdsl),
            "fwa" => Ok(Self::Fwa),
            other => Err(DomainError::InvariantViolation(format!(
                "unknown access technology `{other}` (expected fiber|vdsl|fwa)"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MobilePlan {
    pub plan_id: i64,
    pub plan_name: String,
    pub quota_gb: Decimal,
    pub quota_min: Decimal,
    pub monthly_price: Decimal,
    pub overage_gb: Decimal,
    pub overage_min: Decimal,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HomePlan {
    pub home_id: i64,
    pub name: String,
    pub tech: Technology,
    pub down_mbps: i64,
    pub monthly_price: Decimal,
    /// One-off charge, excluded from recurring pricing.
    pub install_fee: Decimal,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TvPlan {
    pub tv_id: i64,
    pub name: String,
    pub hd_hours_included: Decimal,
    pub monthly_price: Decimal,
}

/// Catalog row describing a discount; carried as data alongside the plans.
/// The engine's tiers are fixed, so rules inform operators, not pricing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BundlingRule {
    pub rule_id: i64,
    pub rule_type: String,
    pub description: String,
    pub discount_percent: Decimal,
    pub applies_to: String,
}

/// Immutable per-request snapshot of every sellable plan. The engine only
/// reads it; ownership stays with the caller.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub mobile_plans: Vec<MobilePlan>,
    pub home_plans: Vec<HomePlan>,
    pub tv_plans: Vec<TvPlan>,
    pub bundling_rules: Vec<BundlingRule>,
}

impl Catalog {
    /// Quotas and overage rates must be non-negative.
    pub fn validate(&self) -> Result<(), DomainError> {
        for plan in &self.mobile_plans {
            if plan.quota_gb < Decimal::ZERO
                || plan.quota_min < Decimal::ZERO
                || plan.overage_gb < Decimal::ZERO
                || plan.overage_min < Decimal::ZERO
            {
                return Err(DomainError::InvariantViolation(format!(
                    "mobile plan {} has a negative quota or overage rate",
                    plan.plan_id
                )));
            }
        }

        Ok(())
    }
}
