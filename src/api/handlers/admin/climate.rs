use axum::extract::{Query, State};
use axum::Json;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::api::ApiResponse;
use crate::db::climate_repo;
use crate::errors::AppError;
use crate::models::ClimateData;
use crate::AppState;

#[derive(Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

/// GET /api/admin/climate
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<ClimateData>>>, AppError> {
    let limit = query.limit.unwrap_or(100).clamp(1, 1000);
    let readings = climate_repo::list_recent(&state.db, limit).await?;

    Ok(Json(ApiResponse::ok(readings)))
}

#[derive(Deserialize)]
pub struct IngestRequest {
    pub source: String,
    pub temperature: Option<Decimal>,
    pub co2_level: Option<Decimal>,
    pub renewable_pct: Option<Decimal>,
    pub carbon_price: Option<Decimal>,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
}

/// POST /api/admin/climate — manual ingestion of a reading.
pub async fn ingest(
    State(state): State<AppState>,
    Json(body): Json<IngestRequest>,
) -> Result<Json<ApiResponse<ClimateData>>, AppError> {
    if body.source.trim().is_empty() {
        return Err(AppError::BadRequest("source is required".into()));
    }

    let reading = climate_repo::insert_reading(
        &state.db,
        body.source.trim(),
        body.temperature,
        body.co2_level,
        body.renewable_pct,
        body.carbon_price,
        body.latitude,
        body.longitude,
    )
    .await?;

    Ok(Json(ApiResponse::ok(reading)))
}
