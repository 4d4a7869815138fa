use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::auth::AuthUser;
use crate::api::ApiResponse;
use crate::auth;
use crate::db::{session_repo, user_repo, wallet_repo};
use crate::errors::AppError;
use crate::models::{Role, User};
use crate::AppState;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// POST /api/auth/register — create an account with an empty wallet.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<Json<ApiResponse<User>>, AppError> {
    let email = body.email.trim().to_lowercase();
    let username = body.username.trim().to_string();

    if email.is_empty() || !email.contains('@') {
        return Err(AppError::BadRequest("a valid email is required".into()));
    }
    if username.len() < 3 {
        return Err(AppError::BadRequest(
            "username must be at least 3 characters".into(),
        ));
    }
    if body.password.len() < 8 {
        return Err(AppError::BadRequest(
            "password must be at least 8 characters".into(),
        ));
    }

    let password_hash = auth::hash_password(&body.password)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("password hashing failed: {e}")))?;

    // Unique violations on email/username surface as 409
    let user = user_repo::insert_user(&state.db, &email, &username, &password_hash)
        .await
        .map_err(AppError::from)?;

    wallet_repo::create_wallet(&state.db, user.id, "EUR").await?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok(Json(ApiResponse::ok(user)))
}

/// POST /api/auth/login — verify credentials, issue a JWT, record the
/// session row that makes it revocable.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, AppError> {
    let email = body.email.trim().to_lowercase();

    let user = user_repo::find_by_email(&state.db, &email)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !user.is_active {
        return Err(AppError::Unauthorized);
    }

    if !auth::verify_password(&body.password, &user.password_hash).await {
        return Err(AppError::Unauthorized);
    }

    let role = Role::from_db_str(&user.role).unwrap_or(Role::User);
    let (token, claims) = auth::issue_token(
        &state.config.jwt_secret,
        user.id,
        role,
        state.config.jwt_expiry_secs,
    )?;

    session_repo::insert_session(&state.db, claims.jti, user.id, auth::expiry_time(&claims))
        .await?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(ApiResponse::ok(LoginResponse { token, user })))
}

/// POST /api/auth/logout — delete the session row; the token dies with it.
pub async fn logout(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<()>>, AppError> {
    session_repo::delete_session(&state.db, user.jti).await?;

    Ok(Json(ApiResponse::ok(())))
}

/// GET /api/auth/me — the authenticated user's own record.
pub async fn me(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<User>>, AppError> {
    let user = user_repo::find_by_id(&state.db, user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".into()))?;

    Ok(Json(ApiResponse::ok(user)))
}
