use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Expected monthly usage for one mobile line in the household.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HouseholdLine {
    pub line_id: String,
    pub expected_gb: Decimal,
    pub expected_min: Decimal,
    pub tv_hd_hours: Decimal,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub user_id: i64,
    pub name: String,
    pub address_id: String,
    pub current_bundle_label: Option<String>,
    pub created_at: DateTime<Utc>,
}
