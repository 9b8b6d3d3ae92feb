use async_trait::async_trait;
use thiserror::Error;

use bundly_core::domain::catalog::{Catalog, Technology};
use bundly_core::domain::coverage::{Coverage, InstallSlot};
use bundly_core::domain::household::{HouseholdLine, User};
use bundly_core::errors::ApplicationError;

pub mod catalog;
pub mod coverage;
pub mod household;
pub mod memory;

pub use catalog::SqlCatalogRepository;
pub use coverage::SqlCoverageRepository;
pub use household::SqlHouseholdRepository;
pub use memory::{InMemoryCatalogRepository, InMemoryCoverageRepository, InMemoryHouseholdRepository};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("{entity} `{id}` was not found")]
    NotFound { entity: &'static str, id: String },
}

impl From<RepositoryError> for ApplicationError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::NotFound { entity, id } => ApplicationError::NotFound { entity, id },
            other => ApplicationError::Persistence(other.to_string()),
        }
    }
}

/// Read-only snapshot of every sellable plan.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn load_catalog(&self) -> Result<Catalog, RepositoryError>;
}

/// Address-level technology availability and install scheduling.
#[async_trait]
pub trait CoverageRepository: Send + Sync {
    async fn coverage_for_address(&self, address_id: &str) -> Result<Coverage, RepositoryError>;

    async fn available_slots(
        &self,
        address_id: &str,
        tech: Technology,
    ) -> Result<Vec<InstallSlot>, RepositoryError>;
}

/// Users and their stored household usage profiles.
#[async_trait]
pub trait HouseholdRepository: Send + Sync {
    async fn user_by_id(&self, user_id: i64) -> Result<User, RepositoryError>;

    /// Lines ordered by line id. NotFound when the user has no household
    /// records; an empty household cannot be priced.
    async fn lines_for_user(&self, user_id: i64) -> Result<Vec<HouseholdLine>, RepositoryError>;
}
