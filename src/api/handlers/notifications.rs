use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::api::auth::AuthUser;
use crate::api::ApiResponse;
use crate::db::notification_repo;
use crate::errors::AppError;
use crate::models::Notification;
use crate::AppState;

#[derive(Serialize)]
pub struct NotificationList {
    pub notifications: Vec<Notification>,
    pub unread: i64,
}

/// GET /api/notifications
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<NotificationList>>, AppError> {
    let notifications = notification_repo::list_by_user(&state.db, user.id, 100).await?;
    let unread = notification_repo::unread_count(&state.db, user.id).await?;

    Ok(Json(ApiResponse::ok(NotificationList {
        notifications,
        unread,
    })))
}

/// POST /api/notifications/:id/read
pub async fn mark_read(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let updated = notification_repo::mark_read(&state.db, id, user.id).await?;

    if !updated {
        return Err(AppError::NotFound("notification not found".into()));
    }

    Ok(Json(ApiResponse::ok(())))
}
