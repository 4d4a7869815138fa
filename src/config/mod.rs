use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,

    // Auth
    pub jwt_secret: String,
    pub jwt_expiry_secs: i64,

    // Third-party API credentials (optional — the matching integration is
    // skipped when absent)
    pub stripe_api_key: Option<String>,
    pub openweather_api_key: Option<String>,
    pub carbon_interface_api_key: Option<String>,
    pub eu_ets_api_key: Option<String>,
    pub verra_api_key: Option<String>,
    pub gold_standard_api_key: Option<String>,

    // Social broadcast
    pub telegram_bot_token: Option<String>,
    pub telegram_chat_id: Option<String>,

    // Background workers
    pub price_tick_interval_secs: u64,
    pub climate_collector_enabled: bool,
    pub climate_collector_interval_secs: u64,
    pub climate_city: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()?,

            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set"))?,
            jwt_expiry_secs: env::var("JWT_EXPIRY_SECS")
                .unwrap_or_else(|_| "86400".into())
                .parse()
                .unwrap_or(86_400),

            stripe_api_key: env::var("STRIPE_API_KEY").ok(),
            openweather_api_key: env::var("OPENWEATHER_API_KEY").ok(),
            carbon_interface_api_key: env::var("CARBON_INTERFACE_API_KEY").ok(),
            eu_ets_api_key: env::var("EU_ETS_API_KEY").ok(),
            verra_api_key: env::var("VERRA_API_KEY").ok(),
            gold_standard_api_key: env::var("GOLD_STANDARD_API_KEY").ok(),

            telegram_bot_token: env::var("TELEGRAM_BOT_TOKEN").ok(),
            telegram_chat_id: env::var("TELEGRAM_CHAT_ID").ok(),

            price_tick_interval_secs: env::var("PRICE_TICK_INTERVAL_SECS")
                .unwrap_or_else(|_| "5".into())
                .parse()
                .unwrap_or(5),
            climate_collector_enabled: env::var("CLIMATE_COLLECTOR_ENABLED")
                .unwrap_or_else(|_| "false".into())
                .parse()
                .unwrap_or(false),
            climate_collector_interval_secs: env::var("CLIMATE_COLLECTOR_INTERVAL_SECS")
                .unwrap_or_else(|_| "900".into())
                .parse()
                .unwrap_or(900),
            climate_city: env::var("CLIMATE_CITY").unwrap_or_else(|_| "Berlin".into()),
        })
    }

    /// Returns true if both Telegram credentials are configured.
    pub fn has_telegram(&self) -> bool {
        self.telegram_bot_token.is_some() && self.telegram_chat_id.is_some()
    }
}
