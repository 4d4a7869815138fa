pub mod analysis_repo;
pub mod climate_repo;
pub mod credit_repo;
pub mod integration_repo;
pub mod notification_repo;
pub mod risk_repo;
pub mod session_repo;
pub mod transaction_repo;
pub mod user_repo;
pub mod wallet_repo;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

pub async fn init_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    // Verify connectivity
    sqlx::query("SELECT 1").execute(&pool).await?;

    Ok(pool)
}
