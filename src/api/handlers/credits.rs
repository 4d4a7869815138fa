use axum::extract::{Path, Query, State};
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::auth::AuthUser;
use crate::api::ws_types::{TradeBroadcast, WsMessage};
use crate::api::ApiResponse;
use crate::db::credit_repo;
use crate::errors::AppError;
use crate::models::{CarbonCredit, Transaction, Wallet};
use crate::services::{notifier, trading};
use crate::AppState;

#[derive(Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
}

/// GET /api/carbon/credits — marketplace listing, optionally filtered by
/// status.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<CarbonCredit>>>, AppError> {
    let credits = credit_repo::list(&state.db, query.status.as_deref()).await?;

    Ok(Json(ApiResponse::ok(credits)))
}

/// GET /api/carbon/credits/:id
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<CarbonCredit>>, AppError> {
    let credit = credit_repo::get_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("credit not found".into()))?;

    Ok(Json(ApiResponse::ok(credit)))
}

/// GET /api/users/credits — the caller's portfolio.
pub async fn mine(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<Vec<CarbonCredit>>>, AppError> {
    let credits = credit_repo::list_by_owner(&state.db, user.id).await?;

    Ok(Json(ApiResponse::ok(credits)))
}

#[derive(Deserialize)]
pub struct CreateCreditRequest {
    pub project_name: String,
    pub description: Option<String>,
    pub vintage_year: i32,
    pub standard: String,
    pub amount: Decimal,
    pub co2_reduction: Decimal,
    pub price: Decimal,
    pub token_id: Option<String>,
}

/// POST /api/carbon/credits — list a credit for sale.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<CreateCreditRequest>,
) -> Result<Json<ApiResponse<CarbonCredit>>, AppError> {
    if body.project_name.trim().is_empty() {
        return Err(AppError::BadRequest("project_name is required".into()));
    }
    if body.amount <= Decimal::ZERO || body.price <= Decimal::ZERO {
        return Err(AppError::BadRequest(
            "amount and price must be positive".into(),
        ));
    }
    if body.co2_reduction < Decimal::ZERO {
        return Err(AppError::BadRequest("co2_reduction cannot be negative".into()));
    }

    let credit = credit_repo::insert_credit(
        &state.db,
        body.project_name.trim(),
        body.description.as_deref(),
        body.vintage_year,
        &body.standard,
        body.amount,
        body.co2_reduction,
        body.price,
        user.id,
        body.token_id.as_deref(),
    )
    .await?;

    if let Some(n) = &state.notifier {
        n.send(&notifier::format_listing_announcement(&credit)).await;
    }

    tracing::info!(credit_id = %credit.id, owner = %user.id, "Credit listed");

    Ok(Json(ApiResponse::ok(credit)))
}

#[derive(Deserialize)]
pub struct BuyRequest {
    pub credit_id: Uuid,
    pub amount: Decimal,
}

#[derive(Serialize)]
pub struct PurchaseReceipt {
    pub transaction: Transaction,
    pub credit: CarbonCredit,
    pub wallet: Wallet,
}

/// POST /api/carbon/buy — atomic purchase; see services::trading.
pub async fn buy(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<BuyRequest>,
) -> Result<Json<ApiResponse<PurchaseReceipt>>, AppError> {
    let outcome = trading::buy_credit(&state.db, user.id, body.credit_id, body.amount).await?;

    // Post-commit side effects: live feed + public announcement
    let _ = state.ws_tx.send(WsMessage::TradeExecuted(TradeBroadcast {
        credit_id: outcome.acquired.id,
        project_name: outcome.acquired.project_name.clone(),
        amount: outcome.transaction.amount.to_string(),
        price: outcome.acquired.price.to_string(),
        total: outcome.transaction.total.to_string(),
    }));

    if let Some(n) = &state.notifier {
        n.send(&notifier::format_trade_announcement(
            &outcome.acquired,
            outcome.transaction.amount,
            outcome.transaction.total,
        ))
        .await;
    }

    Ok(Json(ApiResponse::ok(PurchaseReceipt {
        transaction: outcome.transaction,
        credit: outcome.acquired,
        wallet: outcome.buyer_wallet,
    })))
}

/// POST /api/carbon/credits/:id/retire — take an owned credit out of
/// circulation.
pub async fn retire(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<CarbonCredit>>, AppError> {
    let credit = trading::retire_credit(&state.db, user.id, id).await?;

    Ok(Json(ApiResponse::ok(credit)))
}
