use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::ApiResponse;
use crate::db::user_repo;
use crate::errors::AppError;
use crate::models::User;
use crate::AppState;

/// GET /api/admin/users
pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<User>>>, AppError> {
    let users = user_repo::list_users(&state.db).await?;

    Ok(Json(ApiResponse::ok(users)))
}

#[derive(Deserialize)]
pub struct ActiveRequest {
    pub active: bool,
}

/// POST /api/admin/users/:id/active — activate or deactivate an account.
/// Deactivated accounts fail login with 401.
pub async fn set_active(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<ActiveRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let updated = user_repo::set_active(&state.db, id, body.active).await?;

    if !updated {
        return Err(AppError::NotFound("user not found".into()));
    }

    tracing::info!(user_id = %id, active = body.active, "User activation changed");

    Ok(Json(ApiResponse::ok(())))
}
