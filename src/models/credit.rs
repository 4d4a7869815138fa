use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row for the carbon_credits table.
///
/// `version` is bumped on every amount/status mutation; the purchase flow
/// additionally takes a row lock, so a stale read can never commit.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CarbonCredit {
    pub id: Uuid,
    pub project_name: String,
    pub description: Option<String>,
    pub vintage_year: i32,
    pub standard: String,
    pub amount: Decimal,
    pub co2_reduction: Decimal,
    pub price: Decimal,
    pub status: String,
    pub owner_id: Option<Uuid>,
    pub token_id: Option<String>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
