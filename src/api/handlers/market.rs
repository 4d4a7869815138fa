use axum::extract::State;
use axum::Json;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::db::{climate_repo, credit_repo, transaction_repo, user_repo};
use crate::errors::AppError;
use crate::AppState;

#[derive(Serialize)]
pub struct MarketOverview {
    pub available_credits: i64,
    pub total_volume: String,
    pub last_trade_price: Option<String>,
    pub reference_carbon_price: Option<String>,
    pub active_users: i64,
}

/// GET /api/market/overview
pub async fn overview(
    State(state): State<AppState>,
) -> Result<Json<MarketOverview>, AppError> {
    let available_credits = credit_repo::count_available(&state.db).await?;
    let total_volume = transaction_repo::total_traded_volume(&state.db).await?;
    let last_trade_price = transaction_repo::last_trade_price(&state.db).await?;
    let reference_carbon_price = climate_repo::latest_carbon_price(&state.db).await?;
    let active_users = user_repo::count_active_users(&state.db).await?;

    Ok(Json(MarketOverview {
        available_credits,
        total_volume: total_volume.to_string(),
        last_trade_price: last_trade_price.map(|p| p.to_string()),
        reference_carbon_price: reference_carbon_price.map(|p| p.to_string()),
        active_users,
    }))
}

#[derive(Serialize)]
pub struct PricePoint {
    pub date: String,
    pub avg_price: String,
    pub volume: String,
}

/// GET /api/market/prices — daily average trade price, oldest first.
pub async fn prices(State(state): State<AppState>) -> Result<Json<Vec<PricePoint>>, AppError> {
    let rows: Vec<(chrono::NaiveDate, Option<Decimal>, Option<Decimal>)> = sqlx::query_as(
        r#"
        SELECT created_at::date AS day, AVG(price) AS avg_price, SUM(total) AS volume
        FROM transactions
        WHERE tx_type = 'BUY' AND status = 'COMPLETED' AND price IS NOT NULL
        GROUP BY created_at::date
        ORDER BY day
        "#,
    )
    .fetch_all(&state.db)
    .await?;

    let points = rows
        .into_iter()
        .map(|(day, avg, volume)| PricePoint {
            date: day.to_string(),
            avg_price: avg.unwrap_or(Decimal::ZERO).round_dp(2).to_string(),
            volume: volume.unwrap_or(Decimal::ZERO).to_string(),
        })
        .collect();

    Ok(Json(points))
}

#[derive(Serialize)]
pub struct VolumePoint {
    pub date: String,
    pub trades: i64,
    pub volume: String,
}

/// GET /api/market/stats/volume — trade counts and volume per day.
pub async fn stats_volume(
    State(state): State<AppState>,
) -> Result<Json<Vec<VolumePoint>>, AppError> {
    let rows: Vec<(chrono::NaiveDate, i64, Option<Decimal>)> = sqlx::query_as(
        r#"
        SELECT created_at::date AS day, COUNT(*), SUM(total)
        FROM transactions
        WHERE tx_type = 'BUY' AND status = 'COMPLETED'
        GROUP BY created_at::date
        ORDER BY day DESC
        LIMIT 30
        "#,
    )
    .fetch_all(&state.db)
    .await?;

    let points = rows
        .into_iter()
        .map(|(day, trades, volume)| VolumePoint {
            date: day.to_string(),
            trades,
            volume: volume.unwrap_or(Decimal::ZERO).to_string(),
        })
        .collect();

    Ok(Json(points))
}

#[derive(Serialize)]
pub struct CreditStats {
    pub by_status: Vec<StatusCount>,
    pub total_co2_retired: String,
}

#[derive(Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
    pub total_amount: String,
}

/// GET /api/market/stats/credits — supply broken down by status.
pub async fn stats_credits(
    State(state): State<AppState>,
) -> Result<Json<CreditStats>, AppError> {
    let rows: Vec<(String, i64, Option<Decimal>)> = sqlx::query_as(
        r#"
        SELECT status, COUNT(*), SUM(amount)
        FROM carbon_credits
        GROUP BY status
        ORDER BY status
        "#,
    )
    .fetch_all(&state.db)
    .await?;

    let retired: (Option<Decimal>,) = sqlx::query_as(
        "SELECT SUM(co2_reduction) FROM carbon_credits WHERE status = 'RETIRED'",
    )
    .fetch_one(&state.db)
    .await?;

    let by_status = rows
        .into_iter()
        .map(|(status, count, total)| StatusCount {
            status,
            count,
            total_amount: total.unwrap_or(Decimal::ZERO).to_string(),
        })
        .collect();

    Ok(Json(CreditStats {
        by_status,
        total_co2_retired: retired.0.unwrap_or(Decimal::ZERO).to_string(),
    }))
}
