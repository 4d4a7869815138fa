use rust_decimal::Decimal;
use serde_json::json;

use crate::models::CarbonCredit;

/// Telegram broadcast service for marketplace announcements. Failures are
/// logged but never block the main flow.
#[derive(Debug, Clone)]
pub struct Notifier {
    http: reqwest::Client,
    bot_token: String,
    chat_id: String,
}

impl Notifier {
    pub fn new(bot_token: String, chat_id: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            bot_token,
            chat_id,
        }
    }

    /// Send a Telegram message. Failures are logged as warnings.
    pub async fn send(&self, message: &str) {
        let url = format!(
            "https://api.telegram.org/bot{}/sendMessage",
            self.bot_token
        );

        let body = json!({
            "chat_id": self.chat_id,
            "text": message,
            "parse_mode": "Markdown",
        });

        match self.http.post(&url).json(&body).send().await {
            Ok(resp) => {
                if !resp.status().is_success() {
                    tracing::warn!(
                        status = %resp.status(),
                        "Telegram sendMessage returned non-2xx"
                    );
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to send Telegram notification");
            }
        }
    }
}

/// Format a trade announcement for the public channel.
pub fn format_trade_announcement(
    credit: &CarbonCredit,
    amount: Decimal,
    total: Decimal,
) -> String {
    format!(
        "*Trade Executed*\nProject: {}\nVintage: {}\nStandard: {}\nAmount: {} t\nTotal: {} EUR",
        credit.project_name,
        credit.vintage_year,
        credit.standard,
        amount.round_dp(2),
        total.round_dp(2),
    )
}

/// Format a new-listing announcement.
pub fn format_listing_announcement(credit: &CarbonCredit) -> String {
    format!(
        "*New Listing*\nProject: {}\nVintage: {}\nStandard: {}\nAmount: {} t @ {} EUR/t",
        credit.project_name,
        credit.vintage_year,
        credit.standard,
        credit.amount.round_dp(2),
        credit.price.round_dp(2),
    )
}
