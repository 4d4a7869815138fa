use sqlx::PgPool;
use tokio::time::{interval, Duration};

use crate::config::AppConfig;
use crate::db::integration_repo;
use crate::integrations::{self, platforms, RateGate};

/// Platforms the collector pulls environmental readings from.
const COLLECTED_PLATFORMS: [&str; 2] = [platforms::EU_ETS, platforms::OPENWEATHER];

/// Run the climate-data collection loop. Each pass syncs every enabled
/// data platform; individual failures are logged and skipped.
pub async fn run_climate_collector(
    pool: PgPool,
    config: AppConfig,
    gate: RateGate,
    interval_secs: u64,
) {
    let http = reqwest::Client::new();
    let mut ticker = interval(Duration::from_secs(interval_secs));

    loop {
        ticker.tick().await;

        for platform in COLLECTED_PLATFORMS {
            let integration = match integration_repo::get_by_platform(&pool, platform).await {
                Ok(Some(i)) if i.is_enabled => i,
                Ok(_) => {
                    tracing::debug!(platform, "Climate collector: platform not configured");
                    continue;
                }
                Err(e) => {
                    tracing::error!(error = %e, platform, "Climate collector: lookup failed");
                    continue;
                }
            };

            match integrations::sync_integration(&pool, &http, &gate, &config, &integration).await
            {
                Ok(report) => {
                    tracing::info!(
                        platform,
                        records = report.records_written,
                        detail = %report.detail,
                        "Climate collector: sync complete"
                    );
                }
                Err(e) => {
                    tracing::warn!(error = %e, platform, "Climate collector: sync failed");
                }
            }
        }
    }
}
