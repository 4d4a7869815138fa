use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::IntegrationError;

/// Client for carbon-credit registries (Verra and Gold Standard expose the
/// same project-search surface for our purposes).
#[derive(Debug, Clone)]
pub struct RegistryClient {
    http: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RegistryProject {
    #[serde(alias = "resourceIdentifier")]
    pub id: String,
    #[serde(alias = "resourceName")]
    pub name: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default, alias = "estimatedAnnualEmissionReductions")]
    pub annual_reductions: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
struct ProjectSearchResponse {
    #[serde(default, alias = "value")]
    results: Vec<RegistryProject>,
}

impl RegistryClient {
    pub fn new(http: Client, base_url: String, api_key: String) -> Self {
        Self {
            http,
            base_url,
            api_key,
        }
    }

    /// Pull registered projects, newest first.
    pub async fn fetch_projects(&self, limit: u32) -> Result<Vec<RegistryProject>, IntegrationError> {
        let url = format!("{}/projects/search", self.base_url);
        let resp = self
            .http
            .get(&url)
            .bearer_auth(&self.api_key)
            .query(&[("maxResults", limit.to_string())])
            .send()
            .await?
            .error_for_status()?;

        let body: ProjectSearchResponse = resp.json().await?;
        Ok(body.results)
    }
}
