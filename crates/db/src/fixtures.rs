use sqlx::Executor;

use crate::connection::DbPool;
use crate::repositories::RepositoryError;

const SEED_MOBILE_PLAN_IDS: &[i64] = &[1, 2, 3];
const SEED_HOME_PLAN_IDS: &[i64] = &[1, 2, 3, 4];
const SEED_TV_PLAN_IDS: &[i64] = &[1, 2];
const SEED_ADDRESS_IDS: &[&str] = &["ADDR-001", "ADDR-002"];
const SEED_DEMO_USER_ID: i64 = 1;
const SEED_DEMO_LINE_COUNT: i64 = 3;

/// Deterministic demo dataset: a small plan catalog, two covered addresses,
/// and a three-line demo household. Used by the `seed` CLI command and by
/// repository tests.
pub struct DemoSeedDataset;

#[derive(Debug)]
pub struct SeedResult {
    pub mobile_plans: usize,
    pub home_plans: usize,
    pub tv_plans: usize,
    pub addresses: usize,
}

#[derive(Debug)]
pub struct VerificationResult {
    pub all_present: bool,
    pub checks: Vec<(&'static str, bool)>,
}

impl DemoSeedDataset {
    /// SQL fixture content for the demo dataset.
    pub const SQL: &str = include_str!("../../../config/fixtures/demo_seed_data.sql");

    /// Load the demo dataset into the database. Idempotent.
    pub async fn load(pool: &DbPool) -> Result<SeedResult, RepositoryError> {
        let mut tx = pool.begin().await?;
        tx.execute(sqlx::query(Self::SQL)).await?;
        tx.commit().await?;

        Ok(SeedResult {
            mobile_plans: SEED_MOBILE_PLAN_IDS.len(),
            home_plans: SEED_HOME_PLAN_IDS.len(),
            tv_plans: SEED_TV_PLAN_IDS.len(),
            addresses: SEED_ADDRESS_IDS.len(),
        })
    }

    /// Verify that the seed data exists and matches the contract.
    pub async fn verify(pool: &DbPool) -> Result<VerificationResult, RepositoryError> {
        let mut checks = Vec::new();

        let mobile_count: i64 =
            sqlx::query_scalar("SELECT COUNT(1) FROM mobile_plans WHERE plan_id IN (1, 2, 3)")
                .fetch_one(pool)
                .await?;
        checks.push(("mobile-plans", mobile_count == SEED_MOBILE_PLAN_IDS.len() as i64));

        let home_count: i64 =
            sqlx::query_scalar("SELECT COUNT(1) FROM home_plans WHERE home_id IN (1, 2, 3, 4)")
                .fetch_one(pool)
                .await?;
        checks.push(("home-plans", home_count == SEED_HOME_PLAN_IDS.len() as i64));

        let tv_count: i64 =
            sqlx::query_scalar("SELECT COUNT(1) FROM tv_plans WHERE tv_id IN (1, 2)")
                .fetch_one(pool)
                .await?;
        checks.push(("tv-plans", tv_count == SEED_TV_PLAN_IDS.len() as i64));

        for address_id in SEED_ADDRESS_IDS {
            let exists: i64 =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM coverage WHERE address_id = ?1)")
                    .bind(address_id)
                    .fetch_one(pool)
                    .await?;
            checks.push((*address_id, exists == 1));
        }

        let user_exists: i64 =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE user_id = ?1)")
                .bind(SEED_DEMO_USER_ID)
                .fetch_one(pool)
                .await?;
        checks.push(("demo-user", user_exists == 1));

        let line_count: i64 =
            sqlx::query_scalar("SELECT COUNT(1) FROM household WHERE user_id = ?1")
                .bind(SEED_DEMO_USER_ID)
                .fetch_one(pool)
                .await?;
        checks.push(("demo-household", line_count == SEED_DEMO_LINE_COUNT));

        let all_present = checks.iter().all(|(_, passed)| *passed);
        Ok(VerificationResult { all_present, checks })
    }
}
