use async_trait::async_trait;
use sqlx::Row;

use bundly_core::domain::catalog::Technology;
use bundly_core::domain::coverage::{Coverage, InstallSlot};

use super::catalog::parse_technology;
use super::{CoverageRepository, RepositoryError};
use crate::DbPool;

pub struct SqlCoverageRepository {
    pool: DbPool,
}

impl SqlCoverageRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CoverageRepository for SqlCoverageRepository {
    async fn coverage_for_address(&self, address_id: &str) -> Result<Coverage, RepositoryError> {
        let row = sqlx::query(
            "SELECT address_id, city, district, fiber, vdsl, fwa
             FROM coverage
             WHERE address_id = ?1",
        )
        .bind(address_id)
        .fetch_optional(&self.pool)
        .await?;

        let row = row.ok_or_else(|| RepositoryError::NotFound {
            entity: "coverage",
            id: address_id.to_string(),
        })?;

        Ok(Coverage {
            address_id: row.try_get("address_id")?,
            city: row.try_get("city")?,
            district: row.try_get("district")?,
            fiber: row.try_get::<i64, _>("fiber")? != 0,
            vdsl: row.try_get::<i64, _>("vdsl")? != 0,
            fwa: row.try_get::<i64, _>("fwa")? != 0,
        })
    }

    async fn available_slots(
        &self,
        address_id: &str,
        tech: Technology,
    ) -> Result<Vec<InstallSlot>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT slot_id, address_id, slot_start, slot_end, tech, available
             FROM install_slots
             WHERE address_id = ?1 AND tech = ?2 AND available = 1
             ORDER BY slot_start",
        )
        .bind(address_id)
        .bind(tech.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(InstallSlot {
                    slot_id: row.try_get("slot_id")?,
                    address_id: row.try_get("address_id")?,
                    slot_start: row.try_get("slot_start")?,
                    slot_end: row.try_get("slot_end")?,
                    tech: parse_technology(&row.try_get::<String, _>("tech")?)?,
                    available: row.try_get::<i64, _>("available")? != 0,
                })
            })
            .collect()
    }
}
