//! In-memory repository doubles for engine and HTTP handler tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use bundly_core::domain::catalog::{Catalog, Technology};
use bundly_core::domain::coverage::{Coverage, InstallSlot};
use bundly_core::domain::household::{HouseholdLine, User};

use super::{CatalogRepository, CoverageRepository, HouseholdRepository, RepositoryError};

#[derive(Clone, Default)]
pub struct InMemoryCatalogRepository {
    catalog: Arc<Catalog>,
}

impl InMemoryCatalogRepository {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog: Arc::new(catalog) }
    }
}

#[async_trait]
impl CatalogRepository for InMemoryCatalogRepository {
    async fn load_catalog(&self) -> Result<Catalog, RepositoryError> {
        Ok((*self.catalog).clone())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryCoverageRepository {
    records: Arc<HashMap<String, Coverage>>,
    slots: Arc<Vec<InstallSlot>>,
}

impl InMemoryCoverageRepository {
    pub fn new(records: Vec<Coverage>, slots: Vec<InstallSlot>) -> Self {
        let records = records
            .into_iter()
            .map(|coverage| (coverage.address_id.clone(), coverage))
            .collect::<HashMap<_, _>>();
        Self { records: Arc::new(records), slots: Arc::new(slots) }
    }
}

#[async_trait]
impl CoverageRepository for InMemoryCoverageRepository {
    async fn coverage_for_address(&self, address_id: &str) -> Result<Coverage, RepositoryError> {
        self.records.get(address_id).cloned().ok_or_else(|| RepositoryError::NotFound {
            entity: "coverage",
            id: address_id.to_string(),
        })
    }

    async fn available_slots(
        &self,
        address_id: &str,
        tech: Technology,
    ) -> Result<Vec<InstallSlot>, RepositoryError> {
        let mut slots: Vec<InstallSlot> = self
            .slots
            .iter()
            .filter(|slot| slot.address_id == address_id && slot.tech == tech && slot.available)
            .cloned()
            .collect();
        slots.sort_by_key(|slot| slot.slot_start);
        Ok(slots)
    }
}

#[derive(Clone, Default)]
pub struct InMemoryHouseholdRepository {
    users: Arc<HashMap<i64, User>>,
    lines: Arc<HashMap<i64, Vec<HouseholdLine>>>,
}

impl InMemoryHouseholdRepository {
    pub fn new(users: Vec<User>, lines: HashMap<i64, Vec<HouseholdLine>>) -> Self {
        let users = users.into_iter().map(|user| (user.user_id, user)).collect::<HashMap<_, _>>();
        Self { users: Arc::new(users), lines: Arc::new(lines) }
    }
}

#[async_trait]
impl HouseholdRepository for InMemoryHouseholdRepository {
    async fn user_by_id(&self, user_id: i64) -> Result<User, RepositoryError> {
        self.users.get(&user_id).cloned().ok_or_else(|| RepositoryError::NotFound {
            entity: "user",
            id: user_id.to_string(),
        })
    }

    async fn lines_for_user(&self, user_id: i64) -> Result<Vec<HouseholdLine>, RepositoryError> {
        match self.lines.get(&user_id) {
            Some(lines) if !lines.is_empty() => Ok(lines.clone()),
            _ => Err(RepositoryError::NotFound { entity: "household", id: user_id.to_string() }),
        }
    }
}
