mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use rust_decimal::Decimal;
use tower::ServiceExt;

use zerex_carbon::models::Role;

async fn body_json(resp: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

/// Postgres NUMERIC round-trips with its declared scale ("100.000000"), so
/// balances are compared as decimals, not strings.
fn balance_of(json: &serde_json::Value) -> Decimal {
    json["data"]["wallet"]["balance"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap()
}

fn bearer_request(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let (app, _db) = common::build_test_app().await;

    let resp = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["status"], "healthy");
}

#[tokio::test]
async fn test_register_then_duplicate_conflicts() {
    let (app, _db) = common::build_test_app().await;

    let payload = serde_json::json!({
        "email": "alice@example.com",
        "username": "alice",
        "password": "correct-horse",
    });

    let resp = app
        .clone()
        .oneshot(json_request("POST", "/api/auth/register", payload.clone()))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["email"], "alice@example.com");
    // The hash must never appear in a response
    assert!(json["data"].get("password_hash").is_none());

    let resp = app
        .oneshot(json_request("POST", "/api/auth/register", payload))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_rejects_short_password() {
    let (app, _db) = common::build_test_app().await;

    let resp = app
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            serde_json::json!({
                "email": "bob@example.com",
                "username": "bob",
                "password": "short",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_wrong_password_unauthorized() {
    let (app, db) = common::build_test_app().await;
    let pool = db.pool.clone();
    common::seed_user(&pool, "carol@example.com", "carol", Decimal::ZERO).await;

    let resp = app
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            serde_json::json!({
                "email": "carol@example.com",
                "password": "wrong-password",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_deactivated_account_unauthorized() {
    let (app, db) = common::build_test_app().await;
    let pool = db.pool.clone();
    let (user, _) = common::seed_user(&pool, "dan@example.com", "dan", Decimal::ZERO).await;

    sqlx::query("UPDATE users SET is_active = FALSE WHERE id = $1")
        .bind(user.id)
        .execute(&pool)
        .await
        .unwrap();

    let resp = app
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            serde_json::json!({
                "email": "dan@example.com",
                "password": "password123",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_then_me_and_logout_revokes() {
    let (app, _db) = common::build_test_app().await;

    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            serde_json::json!({
                "email": "erin@example.com",
                "username": "erin",
                "password": "correct-horse",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            serde_json::json!({
                "email": "erin@example.com",
                "password": "correct-horse",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    let token = json["data"]["token"].as_str().unwrap().to_string();

    let resp = app
        .clone()
        .oneshot(bearer_request("GET", "/api/auth/me", &token))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["data"]["username"], "erin");

    let resp = app
        .clone()
        .oneshot(bearer_request("POST", "/api/auth/logout", &token))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // The session row is gone; the same token no longer authenticates
    let resp = app
        .oneshot(bearer_request("GET", "/api/auth/me", &token))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_credits_list_is_public() {
    let (app, db) = common::build_test_app().await;
    let pool = db.pool.clone();

    let (seller, _) = common::seed_user(&pool, "frank@example.com", "frank", Decimal::ZERO).await;
    common::seed_credit(
        &pool,
        seller.id,
        Decimal::from(100),
        Decimal::from(100),
        Decimal::from(10),
    )
    .await;

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/carbon/credits?status=AVAILABLE")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_wallet_requires_auth() {
    let (app, _db) = common::build_test_app().await;

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/users/wallet")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_deposit_and_withdraw_via_api() {
    let (app, db) = common::build_test_app().await;
    let pool = db.pool.clone();

    let (user, _) = common::seed_user(&pool, "grace@example.com", "grace", Decimal::ZERO).await;
    let token = common::issue_test_token(&pool, user.id, Role::User).await;

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/users/wallet/deposit")
                .header("authorization", format!("Bearer {token}"))
                .header("content-type", "application/json")
                .body(Body::from(r#"{"amount":"100"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(balance_of(&json), Decimal::from(100));
    assert_eq!(json["data"]["transaction"]["status"], "COMPLETED");

    // Over-withdrawal fails
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/users/wallet/withdraw")
                .header("authorization", format!("Bearer {token}"))
                .header("content-type", "application/json")
                .body(Body::from(r#"{"amount":"150"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // A valid withdrawal stays pending
    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/users/wallet/withdraw")
                .header("authorization", format!("Bearer {token}"))
                .header("content-type", "application/json")
                .body(Body::from(r#"{"amount":"40"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(balance_of(&json), Decimal::from(60));
    assert_eq!(json["data"]["transaction"]["status"], "PENDING");
}

#[tokio::test]
async fn test_buy_credit_via_api() {
    let (app, db) = common::build_test_app().await;
    let pool = db.pool.clone();

    let (seller, _) = common::seed_user(&pool, "seller@example.com", "seller", Decimal::ZERO).await;
    let (buyer, _) =
        common::seed_user(&pool, "buyer@example.com", "buyer", Decimal::from(500)).await;
    let credit = common::seed_credit(
        &pool,
        seller.id,
        Decimal::from(100),
        Decimal::from(100),
        Decimal::from(10),
    )
    .await;
    let token = common::issue_test_token(&pool, buyer.id, Role::User).await;

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/carbon/buy")
                .header("authorization", format!("Bearer {token}"))
                .header("content-type", "application/json")
                .body(Body::from(format!(
                    r#"{{"credit_id":"{}","amount":"40"}}"#,
                    credit.id
                )))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    assert_eq!(balance_of(&json), Decimal::from(100));
    assert_eq!(json["data"]["transaction"]["tx_type"], "BUY");
    assert_eq!(json["data"]["credit"]["owner_id"], buyer.id.to_string());

    // Retrying with drained funds fails with 400 and changes nothing
    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/carbon/buy")
                .header("authorization", format!("Bearer {token}"))
                .header("content-type", "application/json")
                .body(Body::from(format!(
                    r#"{{"credit_id":"{}","amount":"40"}}"#,
                    credit.id
                )))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_routes_enforce_role() {
    let (app, db) = common::build_test_app().await;
    let pool = db.pool.clone();

    let (user, _) = common::seed_user(&pool, "henry@example.com", "henry", Decimal::ZERO).await;
    let user_token = common::issue_test_token(&pool, user.id, Role::User).await;

    // No token
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/admin/risks")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Plain user token
    let resp = app
        .clone()
        .oneshot(bearer_request("GET", "/api/admin/risks", &user_token))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // Admin token
    let (admin, _) = common::seed_user(&pool, "root@example.com", "root", Decimal::ZERO).await;
    common::promote_to_admin(&pool, admin.id).await;
    let admin_token = common::issue_test_token(&pool, admin.id, Role::Admin).await;

    let resp = app
        .oneshot(bearer_request("GET", "/api/admin/risks", &admin_token))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_risk_crud_roundtrip() {
    let (app, db) = common::build_test_app().await;
    let pool = db.pool.clone();

    let (admin, _) = common::seed_user(&pool, "root@example.com", "root", Decimal::ZERO).await;
    common::promote_to_admin(&pool, admin.id).await;
    let token = common::issue_test_token(&pool, admin.id, Role::Admin).await;

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/admin/risks")
                .header("authorization", format!("Bearer {token}"))
                .header("content-type", "application/json")
                .body(Body::from(
                    r#"{"title":"Registry outage","category":"OPERATIONAL","likelihood":2,"impact":4}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["data"]["severity_score"], 8);
    let risk_id = json["data"]["id"].as_str().unwrap().to_string();

    let resp = app
        .clone()
        .oneshot(bearer_request(
            "GET",
            &format!("/api/admin/risks/{risk_id}"),
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .clone()
        .oneshot(bearer_request(
            "DELETE",
            &format!("/api/admin/risks/{risk_id}"),
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .oneshot(bearer_request(
            "GET",
            &format!("/api/admin/risks/{risk_id}"),
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_market_overview_shape() {
    let (app, _db) = common::build_test_app().await;

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/market/overview")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert!(json["available_credits"].is_number());
    assert!(json["total_volume"].is_string());
    assert!(json["active_users"].is_number());
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let (app, _db) = common::build_test_app().await;

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);

    let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let _text = String::from_utf8(body.to_vec()).unwrap();
    // Endpoint returns valid text; metric names may or may not appear depending
    // on global recorder state in tests (only one recorder per process).
}
