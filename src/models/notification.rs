use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row for the notifications table. The payload column holds a
/// serialized `NotificationKind` so consumers can pattern-match instead of
/// digging through untyped metadata.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub payload: serde_json::Value,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Tagged union of everything the system notifies users about.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum NotificationKind {
    PurchaseConfirmed {
        credit_id: Uuid,
        amount: Decimal,
        total: Decimal,
    },
    CreditSold {
        credit_id: Uuid,
        amount: Decimal,
        total: Decimal,
    },
    DepositCompleted {
        amount: Decimal,
    },
    WithdrawalRequested {
        amount: Decimal,
        transaction_id: Uuid,
    },
    WithdrawalSettled {
        transaction_id: Uuid,
        approved: bool,
    },
    CreditRetired {
        credit_id: Uuid,
        co2_reduction: Decimal,
    },
}
