use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::IntegrationError;

/// Client for the EU ETS allowance-price API.
#[derive(Debug, Clone)]
pub struct EuEtsClient {
    http: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EtsPriceQuote {
    /// EUR per tonne of CO2.
    #[serde(alias = "priceEur")]
    pub price_eur: Decimal,
    #[serde(default, alias = "auctionDate")]
    pub auction_date: Option<String>,
}

impl EuEtsClient {
    pub fn new(http: Client, base_url: String, api_key: String) -> Self {
        Self {
            http,
            base_url,
            api_key,
        }
    }

    /// Fetch the latest allowance auction price.
    pub async fn fetch_carbon_price(&self) -> Result<EtsPriceQuote, IntegrationError> {
        let url = format!("{}/allowances/latest", self.base_url);
        let resp = self
            .http
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await?
            .error_for_status()?;

        let quote: EtsPriceQuote = resp.json().await?;
        Ok(quote)
    }
}
