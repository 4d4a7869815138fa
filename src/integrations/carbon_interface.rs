use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::IntegrationError;

/// Client for the Carbon Interface estimates API.
#[derive(Debug, Clone)]
pub struct CarbonInterfaceClient {
    http: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmissionEstimate {
    pub carbon_kg: Decimal,
    pub carbon_mt: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
struct EstimateEnvelope {
    data: EstimateData,
}

#[derive(Debug, Clone, Deserialize)]
struct EstimateData {
    attributes: EmissionEstimate,
}

impl CarbonInterfaceClient {
    pub fn new(http: Client, base_url: String, api_key: String) -> Self {
        Self {
            http,
            base_url,
            api_key,
        }
    }

    /// Estimate emissions for a block of grid electricity.
    pub async fn estimate_electricity(
        &self,
        megawatt_hours: Decimal,
        country: &str,
    ) -> Result<EmissionEstimate, IntegrationError> {
        let url = format!("{}/estimates", self.base_url);
        let body = json!({
            "type": "electricity",
            "electricity_unit": "mwh",
            "electricity_value": megawatt_hours,
            "country": country,
        });

        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let envelope: EstimateEnvelope = resp.json().await?;
        Ok(envelope.data.attributes)
    }
}
