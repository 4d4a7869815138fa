use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row for the economic_analyses table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EconomicAnalysis {
    pub id: Uuid,
    pub title: String,
    pub indicator: String,
    pub period: String,
    pub value: Decimal,
    pub projected_growth: Option<Decimal>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}
