use sqlx::PgPool;

use crate::models::Integration;

/// Register or reconfigure a platform. Platform names are unique keys.
#[allow(clippy::too_many_arguments)]
pub async fn upsert_integration(
    pool: &PgPool,
    platform: &str,
    base_url: &str,
    api_key: Option<&str>,
    features: &[String],
    rate_limit_per_min: i32,
    is_enabled: bool,
) -> anyhow::Result<Integration> {
    let integration = sqlx::query_as::<_, Integration>(
        r#"
        INSERT INTO integrations (platform, base_url, api_key, features, rate_limit_per_min, is_enabled)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (platform) DO UPDATE
            SET base_url = $2, api_key = $3, features = $4,
                rate_limit_per_min = $5, is_enabled = $6, updated_at = NOW()
        RETURNING *
        "#,
    )
    .bind(platform)
    .bind(base_url)
    .bind(api_key)
    .bind(features)
    .bind(rate_limit_per_min)
    .bind(is_enabled)
    .fetch_one(pool)
    .await?;

    Ok(integration)
}

pub async fn list_integrations(pool: &PgPool) -> anyhow::Result<Vec<Integration>> {
    let rows = sqlx::query_as::<_, Integration>(
        "SELECT * FROM integrations ORDER BY platform",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn get_by_platform(
    pool: &PgPool,
    platform: &str,
) -> anyhow::Result<Option<Integration>> {
    let integration = sqlx::query_as::<_, Integration>(
        "SELECT * FROM integrations WHERE platform = $1",
    )
    .bind(platform)
    .fetch_optional(pool)
    .await?;

    Ok(integration)
}

pub async fn touch_last_sync(pool: &PgPool, platform: &str) -> anyhow::Result<()> {
    sqlx::query(
        "UPDATE integrations SET last_sync_at = NOW(), updated_at = NOW() WHERE platform = $1",
    )
    .bind(platform)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn delete_integration(pool: &PgPool, platform: &str) -> anyhow::Result<bool> {
    let result = sqlx::query("DELETE FROM integrations WHERE platform = $1")
        .bind(platform)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
