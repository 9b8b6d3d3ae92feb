pub mod config;
pub mod domain;
pub mod engine;
pub mod errors;

pub use domain::catalog::{BundlingRule, Catalog, HomePlan, MobilePlan, Technology, TvPlan};
pub use domain::coverage::{Coverage, InstallSlot};
pub use domain::household::{HouseholdLine, User};
pub use domain::recommendation::{
    BundleCandidate, LineAssignment, PriceBreakdown, PricedCandidate, RecommendationResult,
};
pub use engine::recommend;
pub use errors::{ApplicationError, DomainError, InterfaceError};
