pub mod carbon_interface;
pub mod eu_ets;
pub mod openweather;
pub mod rate_gate;
pub mod registry;
pub mod verra;

pub use rate_gate::RateGate;
pub use registry::{test_integration, sync_integration, ProbeOutcome, SyncReport};

use thiserror::Error;

/// Platform identifiers as stored in the integrations table.
pub mod platforms {
    pub const STRIPE: &str = "STRIPE";
    pub const EU_ETS: &str = "EU_ETS";
    pub const CARBON_INTERFACE: &str = "CARBON_INTERFACE";
    pub const VERRA: &str = "VERRA";
    pub const GOLD_STANDARD: &str = "GOLD_STANDARD";
    pub const OPENWEATHER: &str = "OPENWEATHER";
}

#[derive(Debug, Error)]
pub enum IntegrationError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("integration {0} is disabled")]
    Disabled(String),

    #[error("integration {0} has no API key configured")]
    MissingApiKey(String),

    #[error("rate limit exhausted for {0}")]
    RateLimited(String),

    #[error("sync is not supported for {0}")]
    Unsupported(String),

    #[error("unexpected response: {0}")]
    Unexpected(String),
}
