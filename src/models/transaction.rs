use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Immutable ledger row. Once COMPLETED it is never rewritten; the only
/// later transition is PENDING → COMPLETED/CANCELLED for withdrawals,
/// performed by the admin settlement flow.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Transaction {
    pub id: Uuid,
    pub tx_type: String,
    pub amount: Decimal,
    pub price: Option<Decimal>,
    pub total: Decimal,
    pub status: String,
    pub user_id: Uuid,
    pub wallet_id: Uuid,
    pub credit_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}
