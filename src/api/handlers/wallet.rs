use axum::extract::State;
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::api::auth::AuthUser;
use crate::api::ApiResponse;
use crate::db::wallet_repo;
use crate::errors::AppError;
use crate::models::{Transaction, Wallet};
use crate::services::trading;
use crate::AppState;

/// GET /api/users/wallet
pub async fn get(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<Wallet>>, AppError> {
    let wallet = wallet_repo::get_by_user(&state.db, user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("wallet not found".into()))?;

    Ok(Json(ApiResponse::ok(wallet)))
}

#[derive(Deserialize)]
pub struct AmountRequest {
    pub amount: Decimal,
}

#[derive(Serialize)]
pub struct WalletMutation {
    pub wallet: Wallet,
    pub transaction: Transaction,
}

/// POST /api/users/wallet/deposit
pub async fn deposit(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<AmountRequest>,
) -> Result<Json<ApiResponse<WalletMutation>>, AppError> {
    let (wallet, transaction) = trading::deposit(&state.db, user.id, body.amount).await?;

    Ok(Json(ApiResponse::ok(WalletMutation {
        wallet,
        transaction,
    })))
}

/// POST /api/users/wallet/withdraw — debits immediately, settles manually.
pub async fn withdraw(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<AmountRequest>,
) -> Result<Json<ApiResponse<WalletMutation>>, AppError> {
    let (wallet, transaction) = trading::withdraw(&state.db, user.id, body.amount).await?;

    Ok(Json(ApiResponse::ok(WalletMutation {
        wallet,
        transaction,
    })))
}
