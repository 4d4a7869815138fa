use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::models::EconomicAnalysis;

pub async fn insert_analysis(
    pool: &PgPool,
    title: &str,
    indicator: &str,
    period: &str,
    value: Decimal,
    projected_growth: Option<Decimal>,
    notes: Option<&str>,
) -> anyhow::Result<EconomicAnalysis> {
    let analysis = sqlx::query_as::<_, EconomicAnalysis>(
        r#"
        INSERT INTO economic_analyses (title, indicator, period, value, projected_growth, notes)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(title)
    .bind(indicator)
    .bind(period)
    .bind(value)
    .bind(projected_growth)
    .bind(notes)
    .fetch_one(pool)
    .await?;

    Ok(analysis)
}

pub async fn list_analyses(pool: &PgPool) -> anyhow::Result<Vec<EconomicAnalysis>> {
    let rows = sqlx::query_as::<_, EconomicAnalysis>(
        "SELECT * FROM economic_analyses ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// All records for one indicator in insertion order, oldest first, so the
/// growth projection reads a proper time series.
pub async fn list_by_indicator(
    pool: &PgPool,
    indicator: &str,
) -> anyhow::Result<Vec<EconomicAnalysis>> {
    let rows = sqlx::query_as::<_, EconomicAnalysis>(
        "SELECT * FROM economic_analyses WHERE indicator = $1 ORDER BY created_at",
    )
    .bind(indicator)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
