use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A point-in-time environmental reading.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ClimateData {
    pub id: Uuid,
    pub source: String,
    pub temperature: Option<Decimal>,
    pub co2_level: Option<Decimal>,
    pub renewable_pct: Option<Decimal>,
    pub carbon_price: Option<Decimal>,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
    pub recorded_at: DateTime<Utc>,
}
