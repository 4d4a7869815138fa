use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::ApiResponse;
use crate::errors::AppError;
use crate::models::Transaction;
use crate::services::trading;
use crate::AppState;

#[derive(Deserialize)]
pub struct SettleRequest {
    pub approve: bool,
}

/// POST /api/admin/withdrawals/:id/settle — complete or cancel a pending
/// withdrawal. Cancellation re-credits the wallet atomically.
pub async fn settle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<SettleRequest>,
) -> Result<Json<ApiResponse<Transaction>>, AppError> {
    let transaction = trading::settle_withdrawal(&state.db, id, body.approve).await?;

    tracing::info!(
        transaction_id = %id,
        approved = body.approve,
        "Withdrawal settled"
    );

    Ok(Json(ApiResponse::ok(transaction)))
}
