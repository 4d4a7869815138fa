use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::ApiResponse;
use crate::db::risk_repo;
use crate::errors::AppError;
use crate::models::Risk;
use crate::AppState;

#[derive(Deserialize)]
pub struct RiskRequest {
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub likelihood: i32,
    pub impact: i32,
    pub status: Option<String>,
    pub mitigation: Option<String>,
}

fn validate_scores(likelihood: i32, impact: i32) -> Result<(), AppError> {
    if !(1..=5).contains(&likelihood) || !(1..=5).contains(&impact) {
        return Err(AppError::BadRequest(
            "likelihood and impact must be between 1 and 5".into(),
        ));
    }
    Ok(())
}

/// POST /api/admin/risks
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<RiskRequest>,
) -> Result<Json<ApiResponse<Risk>>, AppError> {
    if body.title.trim().is_empty() {
        return Err(AppError::BadRequest("title is required".into()));
    }
    validate_scores(body.likelihood, body.impact)?;

    let risk = risk_repo::insert_risk(
        &state.db,
        body.title.trim(),
        body.description.as_deref(),
        &body.category,
        body.likelihood,
        body.impact,
        body.likelihood * body.impact,
        body.mitigation.as_deref(),
    )
    .await?;

    Ok(Json(ApiResponse::ok(risk)))
}

/// GET /api/admin/risks
pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Risk>>>, AppError> {
    let risks = risk_repo::list_risks(&state.db).await?;

    Ok(Json(ApiResponse::ok(risks)))
}

/// GET /api/admin/risks/:id
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Risk>>, AppError> {
    let risk = risk_repo::get_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("risk not found".into()))?;

    Ok(Json(ApiResponse::ok(risk)))
}

/// PUT /api/admin/risks/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<RiskRequest>,
) -> Result<Json<ApiResponse<Risk>>, AppError> {
    validate_scores(body.likelihood, body.impact)?;

    let risk = risk_repo::update_risk(
        &state.db,
        id,
        body.title.trim(),
        body.description.as_deref(),
        &body.category,
        body.likelihood,
        body.impact,
        body.likelihood * body.impact,
        body.status.as_deref().unwrap_or("OPEN"),
        body.mitigation.as_deref(),
    )
    .await?
    .ok_or_else(|| AppError::NotFound("risk not found".into()))?;

    Ok(Json(ApiResponse::ok(risk)))
}

/// DELETE /api/admin/risks/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let deleted = risk_repo::delete_risk(&state.db, id).await?;

    if !deleted {
        return Err(AppError::NotFound("risk not found".into()));
    }

    Ok(Json(ApiResponse::ok(())))
}

#[derive(Serialize)]
pub struct RiskSummary {
    pub by_status: Vec<StatusCount>,
    pub average_severity: f64,
}

#[derive(Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

/// GET /api/admin/risks/summary
pub async fn summary(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<RiskSummary>>, AppError> {
    let (by_status, average_severity) = risk_repo::summary(&state.db).await?;

    Ok(Json(ApiResponse::ok(RiskSummary {
        by_status: by_status
            .into_iter()
            .map(|(status, count)| StatusCount { status, count })
            .collect(),
        average_severity,
    })))
}
