use std::str::FromStr;

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{sqlite::SqliteRow, Row};

use bundly_core::domain::catalog::{
    BundlingRule, Catalog, HomePlan, MobilePlan, Technology, TvPlan,
};

use super::{CatalogRepository, RepositoryError};
use crate::DbPool;

/// SQLite-backed catalog snapshot loader.
///
/// Decimal columns are stored as TEXT and read through `CAST(... AS TEXT)`;
/// parsing failures surface as decode errors rather than silently rounding
/// through floats.
pub struct SqlCatalogRepository {
    pool: DbPool,
}

impl SqlCatalogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn load_mobile_plans(&self) -> Result<Vec<MobilePlan>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT
                plan_id,
                plan_name,
                CAST(quota_gb AS TEXT) AS quota_gb_text,
                CAST(quota_min AS TEXT) AS quota_min_text,
                CAST(monthly_price AS TEXT) AS monthly_price_text,
                CAST(overage_gb AS TEXT) AS overage_gb_text,
                CAST(overage_min AS TEXT) AS overage_min_text
            FROM mobile_plans
            ORDER BY CAST(monthly_price AS REAL), plan_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(mobile_plan_from_row).collect()
    }

    async fn load_home_plans(&self) -> Result<Vec<HomePlan>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT
                home_id,
                name,
                tech,
                down_mbps,
                CAST(monthly_price AS TEXT) AS monthly_price_text,
                CAST(install_fee AS TEXT) AS install_fee_text
            FROM home_plans
            ORDER BY tech, CAST(monthly_price AS REAL), home_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(home_plan_from_row).collect()
    }

    async fn load_tv_plans(&self) -> Result<Vec<TvPlan>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT
                tv_id,
                name,
                CAST(hd_hours_included AS TEXT) AS hd_hours_text,
                CAST(monthly_price AS TEXT) AS monthly_price_text
            FROM tv_plans
            ORDER BY CAST(monthly_price AS REAL), tv_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(tv_plan_from_row).collect()
    }

    async fn load_bundling_rules(&self) -> Result<Vec<BundlingRule>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT
                rule_id,
                rule_type,
                description,
                CAST(discount_percent AS TEXT) AS discount_percent_text,
                applies_to
            FROM bundling_rules
            ORDER BY rule_type, CAST(discount_percent AS REAL), rule_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(bundling_rule_from_row).collect()
    }
}

#[async_trait]
impl CatalogRepository for SqlCatalogRepository {
    async fn load_catalog(&self) -> Result<Catalog, RepositoryError> {
        let catalog = Catalog {
            mobile_plans: self.load_mobile_plans().await?,
            home_plans: self.load_home_plans().await?,
            tv_plans: self.load_tv_plans().await?,
            bundling_rules: self.load_bundling_rules().await?,
        };

        catalog.validate().map_err(|error| RepositoryError::Decode(error.to_string()))?;
        Ok(catalog)
    }
}

fn mobile_plan_from_row(row: &SqliteRow) -> Result<MobilePlan, RepositoryError> {
    Ok(MobilePlan {
        plan_id: row.try_get("plan_id")?,
        plan_name: row.try_get("plan_name")?,
        quota_gb: parse_decimal("quota_gb", &row.try_get::<String, _>("quota_gb_text")?)?,
        quota_min: parse_decimal("quota_min", &row.try_get::<String, _>("quota_min_text")?)?,
        monthly_price: parse_decimal(
            "monthly_price",
            &row.try_get::<String, _>("monthly_price_text")?,
        )?,
        overage_gb: parse_decimal("overage_gb", &row.try_get::<String, _>("overage_gb_text")?)?,
        overage_min: parse_decimal("overage_min", &row.try_get::<String, _>("overage_min_text")?)?,
    })
}

fn home_plan_from_row(row: &SqliteRow) -> Result<HomePlan, RepositoryError> {
    Ok(HomePlan {
        home_id: row.try_get("home_id")?,
        name: row.try_get("name")?,
        tech: parse_technology(&row.try_get::<String, _>("tech")?)?,
        down_mbps: row.try_get("down_mbps")?,
        monthly_price: parse_decimal(
            "monthly_price",
            &row.try_get::<String, _>("monthly_price_text")?,
        )?,
        install_fee: parse_decimal("install_fee", &row.try_get::<String, _>("install_fee_text")?)?,
    })
}

fn tv_plan_from_row(row: &SqliteRow) -> Result<TvPlan, RepositoryError> {
    Ok(TvPlan {
        tv_id: row.try_get("tv_id")?,
        name: row.try_get("name")?,
        hd_hours_included: parse_decimal(
            "hd_hours_included",
            &row.try_get::<String, _>("hd_hours_text")?,
        )?,
        monthly_price: parse_decimal(
            "monthly_price",
            &row.try_get::<String, _>("monthly_price_text")?,
        )?,
    })
}

fn bundling_rule_from_row(row: &SqliteRow) -> Result<BundlingRule, RepositoryError> {
    Ok(BundlingRule {
        rule_id: row.try_get("rule_id")?,
        rule_type: row.try_get("rule_type")?,
        description: row.try_get("description")?,
        discount_percent: parse_decimal(
            "discount_percent",
            &row.try_get::<String, _>("discount_percent_text")?,
        )?,
        applies_to: row.try_get("applies_to")?,
    })
}

pub(crate) fn parse_decimal(field: &str, value: &str) -> Result<Decimal, RepositoryError> {
    Decimal::from_str(value)
        .map_err(|error| RepositoryError::Decode(format!("invalid decimal value for {field}: {error}")))
}

pub(crate) fn parse_technology(value: &str) -> Result<Technology, RepositoryError> {
    Technology::from_str(value).map_err(|error| RepositoryError::Decode(error.to_string()))
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use bundly_core::domain::catalog::Technology;

    use super::SqlCatalogRepository;
    use crate::repositories::CatalogRepository;
    use crate::{connect_with_settings, migrations, DbPool, DemoSeedDataset};

    fn dec(value: &str) -> Decimal {
        value.parse().expect("decimal literal")
    }

    async fn seeded_pool() -> DbPool {
        let pool = connect_with_settings("sqlite::memory:", 1, 30)
            .await
            .expect("connect test pool");
        migrations::run_pending(&pool).await.expect("run migrations");
        DemoSeedDataset::load(&pool).await.expect("load fixtures");
        pool
    }

    #[tokio::test]
    async fn loads_the_full_catalog_snapshot() {
        let pool = seeded_pool().await;
        let repo = SqlCatalogRepository::new(pool.clone());

        let catalog = repo.load_catalog().await.expect("load catalog");

        assert_eq!(catalog.mobile_plans.len(), 3);
        assert_eq!(catalog.home_plans.len(), 4);
        assert_eq!(catalog.tv_plans.len(), 2);
        assert_eq!(catalog.bundling_rules.len(), 4);

        pool.close().await;
    }

    #[tokio::test]
    async fn mobile_plans_are_ordered_by_price_and_decoded_exactly() {
        let pool = seeded_pool().await;
        let repo = SqlCatalogRepository::new(pool.clone());

        let catalog = repo.load_catalog().await.expect("load catalog");

        let basic = &catalog.mobile_plans[0];
        assert_eq!(basic.plan_name, "Basic 5GB");
        assert_eq!(basic.monthly_price, dec("49.90"));
        assert_eq!(basic.overage_gb, dec("2.00"));
        assert!(catalog.mobile_plans.windows(2).all(|pair| {
            pair[0].monthly_price <= pair[1].monthly_price
        }));

        pool.close().await;
    }

    #[tokio::test]
    async fn home_plan_technologies_decode_into_the_enum() {
        let pool = seeded_pool().await;
        let repo = SqlCatalogRepository::new(pool.clone());

        let catalog = repo.load_catalog().await.expect("load catalog");

        assert!(catalog.home_plans.iter().any(|plan| plan.tech == Technology::Fiber));
        assert!(catalog.home_plans.iter().any(|plan| plan.tech == Technology::Vdsl));
        assert!(catalog.home_plans.iter().any(|plan| plan.tech == Technology::Fwa));

        pool.close().await;
    }

    #[tokio::test]
    async fn malformed_decimal_is_a_decode_error() {
        let pool = seeded_pool().await;
        sqlx::query("UPDATE mobile_plans SET monthly_price = 'not-a-price' WHERE plan_id = 1")
            .execute(&pool)
            .await
            .expect("corrupt row");

        let repo = SqlCatalogRepository::new(pool.clone());
        let error = repo.load_catalog().await.expect_err("decode failure");
        assert!(matches!(error, crate::RepositoryError::Decode(_)));

        pool.close().await;
    }
}
