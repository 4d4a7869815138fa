use axum::middleware;
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::auth::require_admin;
use super::handlers;
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    // Marketplace + auth surface. Handlers that need a caller authenticate
    // through the AuthUser extractor.
    let api = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::metrics::render))
        // Auth
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route("/api/auth/me", get(handlers::auth::me))
        // Carbon credits
        .route(
            "/api/carbon/credits",
            get(handlers::credits::list).post(handlers::credits::create),
        )
        .route("/api/carbon/credits/:id", get(handlers::credits::detail))
        .route("/api/carbon/credits/:id/retire", post(handlers::credits::retire))
        .route("/api/carbon/buy", post(handlers::credits::buy))
        // Wallet + portfolio
        .route("/api/users/wallet", get(handlers::wallet::get))
        .route("/api/users/wallet/deposit", post(handlers::wallet::deposit))
        .route("/api/users/wallet/withdraw", post(handlers::wallet::withdraw))
        .route("/api/users/credits", get(handlers::credits::mine))
        // Ledger
        .route("/api/transactions", get(handlers::transactions::list))
        // Notifications
        .route("/api/notifications", get(handlers::notifications::list))
        .route(
            "/api/notifications/:id/read",
            post(handlers::notifications::mark_read),
        )
        // Market aggregates
        .route("/api/market/overview", get(handlers::market::overview))
        .route("/api/market/prices", get(handlers::market::prices))
        .route("/api/market/stats/volume", get(handlers::market::stats_volume))
        .route("/api/market/stats/credits", get(handlers::market::stats_credits))
        // Live feed
        .route("/ws", get(handlers::ws::handler));

    // Admin back-office — authenticated ADMIN role only
    let admin = Router::new()
        .route(
            "/api/admin/risks",
            get(handlers::admin::risks::list).post(handlers::admin::risks::create),
        )
        .route("/api/admin/risks/summary", get(handlers::admin::risks::summary))
        .route(
            "/api/admin/risks/:id",
            get(handlers::admin::risks::detail)
                .put(handlers::admin::risks::update)
                .delete(handlers::admin::risks::delete),
        )
        .route(
            "/api/admin/analyses",
            get(handlers::admin::analyses::list).post(handlers::admin::analyses::create),
        )
        .route(
            "/api/admin/analyses/summary",
            get(handlers::admin::analyses::summary),
        )
        .route(
            "/api/admin/integrations",
            get(handlers::admin::integrations::list).post(handlers::admin::integrations::upsert),
        )
        .route(
            "/api/admin/integrations/:platform",
            delete(handlers::admin::integrations::delete),
        )
        .route(
            "/api/admin/integrations/:platform/test",
            post(handlers::admin::integrations::test),
        )
        .route(
            "/api/admin/integrations/:platform/sync",
            post(handlers::admin::integrations::sync),
        )
        .route(
            "/api/admin/climate",
            get(handlers::admin::climate::list).post(handlers::admin::climate::ingest),
        )
        .route("/api/admin/users", get(handlers::admin::users::list))
        .route(
            "/api/admin/users/:id/active",
            post(handlers::admin::users::set_active),
        )
        .route(
            "/api/admin/withdrawals/:id/settle",
            post(handlers::admin::withdrawals::settle),
        )
        .layer(middleware::from_fn_with_state(state.clone(), require_admin));

    // CORS: the dashboard is served from another origin in development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    api.merge(admin)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
