use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::models::ClimateData;

#[allow(clippy::too_many_arguments)]
pub async fn insert_reading(
    pool: &PgPool,
    source: &str,
    temperature: Option<Decimal>,
    co2_level: Option<Decimal>,
    renewable_pct: Option<Decimal>,
    carbon_price: Option<Decimal>,
    latitude: Option<Decimal>,
    longitude: Option<Decimal>,
) -> anyhow::Result<ClimateData> {
    let reading = sqlx::query_as::<_, ClimateData>(
        r#"
        INSERT INTO climate_data (source, temperature, co2_level, renewable_pct, carbon_price, latitude, longitude)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(source)
    .bind(temperature)
    .bind(co2_level)
    .bind(renewable_pct)
    .bind(carbon_price)
    .bind(latitude)
    .bind(longitude)
    .fetch_one(pool)
    .await?;

    Ok(reading)
}

pub async fn list_recent(pool: &PgPool, limit: i64) -> anyhow::Result<Vec<ClimateData>> {
    let rows = sqlx::query_as::<_, ClimateData>(
        "SELECT * FROM climate_data ORDER BY recorded_at DESC LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Latest stored carbon price from any source, used as the price-tick
/// fallback when no trade has happened yet.
pub async fn latest_carbon_price(pool: &PgPool) -> anyhow::Result<Option<Decimal>> {
    let row: Option<(Option<Decimal>,)> = sqlx::query_as(
        r#"
        SELECT carbon_price FROM climate_data
        WHERE carbon_price IS NOT NULL
        ORDER BY recorded_at DESC
        LIMIT 1
        "#,
    )
    .fetch_optional(pool)
    .await?;

    Ok(row.and_then(|r| r.0))
}
