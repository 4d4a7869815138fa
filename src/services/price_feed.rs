use chrono::Utc;
use sqlx::PgPool;
use tokio::sync::broadcast;
use tokio::time::{interval, Duration};

use crate::api::ws_types::{PriceTick, WsMessage};
use crate::db::{climate_repo, transaction_repo};

/// Run the market price feed loop. Each tick publishes the last real trade
/// price, falling back to the latest stored EU ETS allowance price. When
/// neither source has data the loop broadcasts a typed unavailable message
/// rather than synthesizing a number.
pub async fn run_price_feed(
    pool: PgPool,
    ws_tx: broadcast::Sender<WsMessage>,
    interval_secs: u64,
) {
    let mut ticker = interval(Duration::from_secs(interval_secs));

    loop {
        ticker.tick().await;

        // No point querying when nobody is listening
        if ws_tx.receiver_count() == 0 {
            continue;
        }

        let message = match derive_tick(&pool).await {
            Ok(Some(tick)) => WsMessage::PriceTick(tick),
            Ok(None) => WsMessage::PriceUnavailable {
                reason: "no trades and no reference price recorded yet".into(),
            },
            Err(e) => {
                tracing::error!(error = %e, "Price feed: failed to derive tick");
                continue;
            }
        };

        metrics::counter!("price_ticks_total").increment(1);

        // Err just means all receivers disconnected between the check and
        // the send
        let _ = ws_tx.send(message);
    }
}

async fn derive_tick(pool: &PgPool) -> anyhow::Result<Option<PriceTick>> {
    if let Some(price) = transaction_repo::last_trade_price(pool).await? {
        return Ok(Some(PriceTick {
            price: price.to_string(),
            currency: "EUR".into(),
            source: "market".into(),
            at: Utc::now(),
        }));
    }

    if let Some(price) = climate_repo::latest_carbon_price(pool).await? {
        return Ok(Some(PriceTick {
            price: price.to_string(),
            currency: "EUR".into(),
            source: "eu_ets".into(),
            at: Utc::now(),
        }));
    }

    Ok(None)
}
