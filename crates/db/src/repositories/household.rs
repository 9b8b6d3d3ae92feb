use async_trait::async_trait;
use sqlx::Row;

use bundly_core::domain::household::{HouseholdLine, User};

use super::catalog::parse_decimal;
use super::{HouseholdRepository, RepositoryError};
use crate::DbPool;

pub struct SqlHouseholdRepository {
    pool: DbPool,
}

impl SqlHouseholdRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HouseholdRepository for SqlHouseholdRepository {
    async fn user_by_id(&self, user_id: i64) -> Result<User, RepositoryError> {
        let row = sqlx::query(
            "SELECT user_id, name, address_id, current_bundle_label, created_at
             FROM users
             WHERE user_id = ?1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let row = row.ok_or_else(|| RepositoryError::NotFound {
            entity: "user",
            id: user_id.to_string(),
        })?;

        Ok(User {
            user_id: row.try_get("user_id")?,
            name: row.try_get("name")?,
            address_id: row.try_get("address_id")?,
            current_bundle_label: row.try_get("current_bundle_label")?,
            created_at: row.try_get("created_at")?,
        })
    }

    async fn lines_for_user(&self, user_id: i64) -> Result<Vec<HouseholdLine>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT
                line_id,
                CAST(expected_gb AS TEXT) AS expected_gb_text,
                CAST(expected_min AS TEXT) AS expected_min_text,
                CAST(tv_hd_hours AS TEXT) AS tv_hd_hours_text
            FROM household
            WHERE user_id = ?1
            ORDER BY line_id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        if rows.is_empty() {
            return Err(RepositoryError::NotFound {
                entity: "household",
                id: user_id.to_string(),
            });
        }

        rows.iter()
            .map(|row| {
                Ok(HouseholdLine {
                    line_id: row.try_get("line_id")?,
                    expected_gb: parse_decimal(
                        "expected_gb",
                        &row.try_get::<String, _>("expected_gb_text")?,
                    )?,
                    expected_min: parse_decimal(
                        "expected_min",
                        &row.try_get::<String, _>("expected_min_text")?,
                    )?,
                    tv_hd_hours: parse_decimal(
                        "tv_hd_hours",
                        &row.try_get::<String, _>("tv_hd_hours_text")?,
                    )?,
                })
            })
            .collect()
    }
}
