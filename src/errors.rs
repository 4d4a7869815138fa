use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Unprocessable: {0}")]
    Unprocessable(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".into()),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "Forbidden".into()),
            AppError::Unprocessable(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            AppError::RateLimited(msg) => (StatusCode::TOO_MANY_REQUESTS, msg.clone()),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".into())
            }
        };

        (
            status,
            Json(ErrorBody {
                success: false,
                error: message,
            }),
        )
            .into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::RowNotFound => AppError::NotFound("record not found".into()),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict("record already exists".into())
            }
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                AppError::BadRequest("referenced record does not exist".into())
            }
            _ => AppError::Internal(e.into()),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(_: jsonwebtoken::errors::Error) -> Self {
        AppError::Unauthorized
    }
}

impl From<crate::services::trading::TradeError> for AppError {
    fn from(e: crate::services::trading::TradeError) -> Self {
        use crate::services::trading::TradeError;

        match e {
            TradeError::CreditNotFound | TradeError::WalletNotFound => {
                AppError::NotFound(e.to_string())
            }
            TradeError::NotOwner => AppError::Forbidden,
            TradeError::InvalidState
            | TradeError::SelfPurchase
            | TradeError::NotSettleable => AppError::Unprocessable(e.to_string()),
            TradeError::InsufficientSupply { .. }
            | TradeError::InsufficientFunds { .. }
            | TradeError::NonPositiveAmount => AppError::BadRequest(e.to_string()),
            TradeError::Db(inner) => AppError::from(inner),
        }
    }
}

impl From<crate::integrations::IntegrationError> for AppError {
    fn from(e: crate::integrations::IntegrationError) -> Self {
        use crate::integrations::IntegrationError;

        match e {
            IntegrationError::RateLimited(platform) => {
                AppError::RateLimited(format!("rate limit exhausted for {platform}"))
            }
            IntegrationError::Disabled(_)
            | IntegrationError::MissingApiKey(_)
            | IntegrationError::Unsupported(_) => AppError::Unprocessable(e.to_string()),
            IntegrationError::Http(inner) => {
                AppError::Unprocessable(format!("upstream request failed: {inner}"))
            }
            IntegrationError::Unexpected(msg) => AppError::Internal(anyhow::anyhow!(msg)),
        }
    }
}
