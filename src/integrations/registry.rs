use std::time::Instant;

use reqwest::Client;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use crate::config::AppConfig;
use crate::db::{climate_repo, integration_repo};
use crate::models::Integration;

use super::carbon_interface::CarbonInterfaceClient;
use super::eu_ets::EuEtsClient;
use super::openweather::OpenWeatherClient;
use super::verra::RegistryClient;
use super::{platforms, IntegrationError, RateGate};

/// Outcome of a connectivity probe. Reachability failures are data, not
/// errors — the admin UI renders both arms.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ProbeOutcome {
    Ok { status: u16, latency_ms: u64 },
    Unavailable { reason: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub platform: String,
    pub records_written: u32,
    pub detail: String,
}

fn resolve_api_key(integration: &Integration, config: &AppConfig) -> Option<String> {
    if let Some(key) = &integration.api_key {
        return Some(key.clone());
    }

    match integration.platform.as_str() {
        platforms::STRIPE => config.stripe_api_key.clone(),
        platforms::EU_ETS => config.eu_ets_api_key.clone(),
        platforms::CARBON_INTERFACE => config.carbon_interface_api_key.clone(),
        platforms::VERRA => config.verra_api_key.clone(),
        platforms::GOLD_STANDARD => config.gold_standard_api_key.clone(),
        platforms::OPENWEATHER => config.openweather_api_key.clone(),
        _ => None,
    }
}

fn check_dispatchable(
    integration: &Integration,
    gate_ok: bool,
) -> Result<(), IntegrationError> {
    if !integration.is_enabled {
        return Err(IntegrationError::Disabled(integration.platform.clone()));
    }
    if !gate_ok {
        return Err(IntegrationError::RateLimited(integration.platform.clone()));
    }
    Ok(())
}

/// Probe a platform: one authenticated GET against its base URL.
pub async fn test_integration(
    http: &Client,
    gate: &RateGate,
    config: &AppConfig,
    integration: &Integration,
) -> Result<ProbeOutcome, IntegrationError> {
    let gate_ok = gate
        .try_acquire(&integration.platform, integration.rate_limit_per_min.max(0) as u32)
        .await;
    check_dispatchable(integration, gate_ok)?;

    let mut request = http.get(&integration.base_url);
    if let Some(key) = resolve_api_key(integration, config) {
        request = request.bearer_auth(key);
    }

    let started = Instant::now();
    match request.send().await {
        Ok(resp) => {
            let latency_ms = started.elapsed().as_millis() as u64;
            let status = resp.status();
            if status.is_success() {
                Ok(ProbeOutcome::Ok {
                    status: status.as_u16(),
                    latency_ms,
                })
            } else {
                Ok(ProbeOutcome::Unavailable {
                    reason: format!("HTTP {status}"),
                })
            }
        }
        Err(e) => Ok(ProbeOutcome::Unavailable {
            reason: e.to_string(),
        }),
    }
}

/// Pull the platform's data and persist what we keep. Platforms with
/// nothing to pull are rejected as Unsupported.
pub async fn sync_integration(
    pool: &PgPool,
    http: &Client,
    gate: &RateGate,
    config: &AppConfig,
    integration: &Integration,
) -> Result<SyncReport, IntegrationError> {
    let gate_ok = gate
        .try_acquire(&integration.platform, integration.rate_limit_per_min.max(0) as u32)
        .await;
    check_dispatchable(integration, gate_ok)?;

    let api_key = resolve_api_key(integration, config)
        .ok_or_else(|| IntegrationError::MissingApiKey(integration.platform.clone()))?;

    let report = match integration.platform.as_str() {
        platforms::EU_ETS => {
            let client = EuEtsClient::new(http.clone(), integration.base_url.clone(), api_key);
            let quote = client.fetch_carbon_price().await?;

            climate_repo::insert_reading(
                pool,
                platforms::EU_ETS,
                None,
                None,
                None,
                Some(quote.price_eur),
                None,
                None,
            )
            .await
            .map_err(|e| IntegrationError::Unexpected(e.to_string()))?;

            SyncReport {
                platform: integration.platform.clone(),
                records_written: 1,
                detail: format!("allowance price {} EUR/t", quote.price_eur),
            }
        }

        platforms::OPENWEATHER => {
            let client = OpenWeatherClient::new(http.clone(), integration.base_url.clone(), api_key);
            let reading = client.fetch_current(&config.climate_city).await?;

            climate_repo::insert_reading(
                pool,
                platforms::OPENWEATHER,
                Some(reading.main.temp),
                None,
                None,
                None,
                Some(reading.coord.lat),
                Some(reading.coord.lon),
            )
            .await
            .map_err(|e| IntegrationError::Unexpected(e.to_string()))?;

            SyncReport {
                platform: integration.platform.clone(),
                records_written: 1,
                detail: format!("current temperature {}°C in {}", reading.main.temp, config.climate_city),
            }
        }

        platforms::VERRA | platforms::GOLD_STANDARD => {
            let client = RegistryClient::new(http.clone(), integration.base_url.clone(), api_key);
            let projects = client.fetch_projects(25).await?;

            SyncReport {
                platform: integration.platform.clone(),
                records_written: 0,
                detail: format!("{} registry projects visible", projects.len()),
            }
        }

        platforms::CARBON_INTERFACE => {
            let client =
                CarbonInterfaceClient::new(http.clone(), integration.base_url.clone(), api_key);
            let estimate = client.estimate_electricity(Decimal::ONE, "de").await?;

            SyncReport {
                platform: integration.platform.clone(),
                records_written: 0,
                detail: format!("reference estimate {} kg CO2 per MWh", estimate.carbon_kg),
            }
        }

        other => return Err(IntegrationError::Unsupported(other.to_string())),
    };

    integration_repo::touch_last_sync(pool, &integration.platform)
        .await
        .map_err(|e| IntegrationError::Unexpected(e.to_string()))?;

    metrics::counter!("integration_syncs_total").increment(1);

    Ok(report)
}
