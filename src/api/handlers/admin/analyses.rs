use axum::extract::{Query, State};
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::api::ApiResponse;
use crate::db::analysis_repo;
use crate::errors::AppError;
use crate::models::EconomicAnalysis;
use crate::services::analysis::{self, SeriesSummary};
use crate::AppState;

#[derive(Deserialize)]
pub struct AnalysisRequest {
    pub title: String,
    pub indicator: String,
    pub period: String,
    pub value: Decimal,
    pub projected_growth: Option<Decimal>,
    pub notes: Option<String>,
}

/// POST /api/admin/analyses
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<AnalysisRequest>,
) -> Result<Json<ApiResponse<EconomicAnalysis>>, AppError> {
    if body.title.trim().is_empty() || body.indicator.trim().is_empty() {
        return Err(AppError::BadRequest(
            "title and indicator are required".into(),
        ));
    }

    let analysis = analysis_repo::insert_analysis(
        &state.db,
        body.title.trim(),
        body.indicator.trim(),
        &body.period,
        body.value,
        body.projected_growth,
        body.notes.as_deref(),
    )
    .await?;

    Ok(Json(ApiResponse::ok(analysis)))
}

/// GET /api/admin/analyses
pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<EconomicAnalysis>>>, AppError> {
    let analyses = analysis_repo::list_analyses(&state.db).await?;

    Ok(Json(ApiResponse::ok(analyses)))
}

#[derive(Deserialize)]
pub struct SummaryQuery {
    pub indicator: String,
}

#[derive(Serialize)]
pub struct IndicatorSummary {
    pub indicator: String,
    #[serde(flatten)]
    pub summary: SeriesSummary,
}

/// GET /api/admin/analyses/summary?indicator=X — derived aggregates over
/// the indicator's stored series.
pub async fn summary(
    State(state): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<ApiResponse<IndicatorSummary>>, AppError> {
    let rows = analysis_repo::list_by_indicator(&state.db, &query.indicator).await?;
    let values: Vec<Decimal> = rows.iter().map(|r| r.value).collect();

    Ok(Json(ApiResponse::ok(IndicatorSummary {
        indicator: query.indicator,
        summary: analysis::summarize(&values),
    })))
}
