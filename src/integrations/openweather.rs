use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::IntegrationError;

/// Client for the OpenWeather current-weather API. OpenWeather signs with a
/// query-string key rather than a bearer header.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    http: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WeatherReading {
    pub main: WeatherMain,
    pub coord: WeatherCoord,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WeatherMain {
    pub temp: Decimal,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WeatherCoord {
    pub lat: Decimal,
    pub lon: Decimal,
}

impl OpenWeatherClient {
    pub fn new(http: Client, base_url: String, api_key: String) -> Self {
        Self {
            http,
            base_url,
            api_key,
        }
    }

    pub async fn fetch_current(&self, city: &str) -> Result<WeatherReading, IntegrationError> {
        let url = format!("{}/data/2.5/weather", self.base_url);
        let resp = self
            .http
            .get(&url)
            .query(&[("q", city), ("units", "metric"), ("appid", &self.api_key)])
            .send()
            .await?
            .error_for_status()?;

        let reading: WeatherReading = resp.json().await?;
        Ok(reading)
    }
}
