use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use crate::api::ApiResponse;
use crate::db::integration_repo;
use crate::errors::AppError;
use crate::integrations::{self, ProbeOutcome, SyncReport};
use crate::models::Integration;
use crate::AppState;

#[derive(Deserialize)]
pub struct IntegrationRequest {
    pub platform: String,
    pub base_url: String,
    pub api_key: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
    pub rate_limit_per_min: Option<i32>,
    pub is_enabled: Option<bool>,
}

/// POST /api/admin/integrations — register or reconfigure a platform.
pub async fn upsert(
    State(state): State<AppState>,
    Json(body): Json<IntegrationRequest>,
) -> Result<Json<ApiResponse<Integration>>, AppError> {
    let platform = body.platform.trim().to_uppercase();
    if platform.is_empty() {
        return Err(AppError::BadRequest("platform is required".into()));
    }
    if body.base_url.trim().is_empty() {
        return Err(AppError::BadRequest("base_url is required".into()));
    }

    let rate_limit = body.rate_limit_per_min.unwrap_or(60);
    if rate_limit < 0 {
        return Err(AppError::BadRequest("rate_limit_per_min cannot be negative".into()));
    }

    let integration = integration_repo::upsert_integration(
        &state.db,
        &platform,
        body.base_url.trim(),
        body.api_key.as_deref(),
        &body.features,
        rate_limit,
        body.is_enabled.unwrap_or(true),
    )
    .await?;

    Ok(Json(ApiResponse::ok(integration)))
}

/// GET /api/admin/integrations
pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Integration>>>, AppError> {
    let integrations = integration_repo::list_integrations(&state.db).await?;

    Ok(Json(ApiResponse::ok(integrations)))
}

/// DELETE /api/admin/integrations/:platform
pub async fn delete(
    State(state): State<AppState>,
    Path(platform): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let deleted = integration_repo::delete_integration(&state.db, &platform.to_uppercase()).await?;

    if !deleted {
        return Err(AppError::NotFound("integration not found".into()));
    }

    Ok(Json(ApiResponse::ok(())))
}

async fn load(state: &AppState, platform: &str) -> Result<Integration, AppError> {
    integration_repo::get_by_platform(&state.db, &platform.to_uppercase())
        .await?
        .ok_or_else(|| AppError::NotFound("integration not found".into()))
}

/// POST /api/admin/integrations/:platform/test — connectivity probe.
pub async fn test(
    State(state): State<AppState>,
    Path(platform): Path<String>,
) -> Result<Json<ApiResponse<ProbeOutcome>>, AppError> {
    let integration = load(&state, &platform).await?;

    let outcome = integrations::test_integration(
        &state.http,
        &state.rate_gate,
        &state.config,
        &integration,
    )
    .await?;

    Ok(Json(ApiResponse::ok(outcome)))
}

/// POST /api/admin/integrations/:platform/sync — pull the platform's data.
pub async fn sync(
    State(state): State<AppState>,
    Path(platform): Path<String>,
) -> Result<Json<ApiResponse<SyncReport>>, AppError> {
    let integration = load(&state, &platform).await?;

    let report = integrations::sync_integration(
        &state.db,
        &state.http,
        &state.rate_gate,
        &state.config,
        &integration,
    )
    .await?;

    Ok(Json(ApiResponse::ok(report)))
}
