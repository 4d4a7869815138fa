use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::api::auth::AuthUser;
use crate::api::ApiResponse;
use crate::db::transaction_repo;
use crate::errors::AppError;
use crate::models::Transaction;
use crate::AppState;

#[derive(Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

/// GET /api/transactions — the caller's ledger history.
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<Transaction>>>, AppError> {
    let limit = query.limit.unwrap_or(50).clamp(1, 500);
    let transactions = transaction_repo::list_by_user(&state.db, user.id, limit).await?;

    Ok(Json(ApiResponse::ok(transactions)))
}
