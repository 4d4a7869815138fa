use std::sync::Arc;

use tokio::sync::broadcast;

use zerex_carbon::api::router::create_router;
use zerex_carbon::api::ws_types::WsMessage;
use zerex_carbon::config::AppConfig;
use zerex_carbon::integrations::RateGate;
use zerex_carbon::services::climate_collector::run_climate_collector;
use zerex_carbon::services::notifier::Notifier;
use zerex_carbon::services::price_feed::run_price_feed;
use zerex_carbon::{db, metrics, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    let addr = format!("{}:{}", config.host, config.port);

    tracing::info!("Connecting to database...");
    let pool = db::init_pool(&config.database_url).await?;
    tracing::info!("Database connected");

    sqlx::migrate!("./migrations").run(&pool).await?;

    let metrics_handle = metrics::init_metrics();
    let rate_gate = RateGate::new();

    let notifier = if config.has_telegram() {
        Some(Arc::new(Notifier::new(
            config.telegram_bot_token.clone().unwrap(),
            config.telegram_chat_id.clone().unwrap(),
        )))
    } else {
        tracing::info!("Telegram credentials absent — broadcast notifier disabled");
        None
    };

    // --- WebSocket broadcast channel for the market feed ---
    let (ws_tx, _) = broadcast::channel::<WsMessage>(256);

    // --- Price feed: one derived tick per interval ---
    {
        let feed_pool = pool.clone();
        let feed_tx = ws_tx.clone();
        let interval = config.price_tick_interval_secs;
        tokio::spawn(async move {
            run_price_feed(feed_pool, feed_tx, interval).await;
        });
        tracing::info!(interval_secs = interval, "Price feed spawned");
    }

    // --- Climate collector: periodic third-party data pulls ---
    if config.climate_collector_enabled {
        let collector_pool = pool.clone();
        let collector_config = config.clone();
        let collector_gate = rate_gate.clone();
        let interval = config.climate_collector_interval_secs;
        tokio::spawn(async move {
            run_climate_collector(collector_pool, collector_config, collector_gate, interval)
                .await;
        });
        tracing::info!(interval_secs = interval, "Climate collector spawned");
    } else {
        tracing::info!("Climate collector disabled (CLIMATE_COLLECTOR_ENABLED=false)");
    }

    let state = AppState {
        db: pool,
        config,
        ws_tx,
        metrics_handle,
        notifier,
        rate_gate,
        http: reqwest::Client::new(),
    };
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {addr}");
    axum::serve(listener, router).await?;

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();
}
