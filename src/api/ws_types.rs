use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Messages broadcast to all connected WebSocket clients.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum WsMessage {
    #[serde(rename = "price_tick")]
    PriceTick(PriceTick),

    /// Sent when no trade and no reference price exists yet; clients render
    /// an explicit gap instead of a made-up number.
    #[serde(rename = "price_unavailable")]
    PriceUnavailable { reason: String },

    #[serde(rename = "trade_executed")]
    TradeExecuted(TradeBroadcast),
}

#[derive(Debug, Clone, Serialize)]
pub struct PriceTick {
    pub price: String,
    pub currency: String,
    /// "market" when derived from the last trade, "eu_ets" for the
    /// reference fallback.
    pub source: String,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TradeBroadcast {
    pub credit_id: Uuid,
    pub project_name: String,
    pub amount: String,
    pub price: String,
    pub total: String,
}
