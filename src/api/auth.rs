use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::RequestPartsExt;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::typed_header::TypedHeader;
use uuid::Uuid;

use crate::auth::{decode_token, Claims};
use crate::db::session_repo;
use crate::errors::AppError;
use crate::models::Role;
use crate::AppState;

/// The authenticated caller. Extracting it enforces authentication: the
/// bearer token must decode against the configured secret and its session
/// row must still be live, so logout revokes it immediately.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: Role,
    pub jti: Uuid,
}

impl From<&Claims> for AuthUser {
    fn from(claims: &Claims) -> Self {
        Self {
            id: claims.sub,
            role: claims.role,
            jti: claims.jti,
        }
    }
}

async fn authenticate(parts: &mut Parts, state: &AppState) -> Result<AuthUser, AppError> {
    let TypedHeader(Authorization(bearer)) = parts
        .extract::<TypedHeader<Authorization<Bearer>>>()
        .await
        .map_err(|_| AppError::Unauthorized)?;

    let claims = decode_token(&state.config.jwt_secret, bearer.token())
        .map_err(|_| AppError::Unauthorized)?;

    match session_repo::is_live(&state.db, claims.jti).await {
        Ok(true) => Ok(AuthUser::from(&claims)),
        Ok(false) => Err(AppError::Unauthorized),
        Err(e) => Err(AppError::Internal(e)),
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authenticate(parts, state).await
    }
}

/// Admin gate for the /api/admin subtree: full authentication plus a role
/// check in one middleware.
pub async fn require_admin(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = req.into_parts();

    let user = match authenticate(&mut parts, &state).await {
        Ok(user) => user,
        Err(e) => return e.into_response(),
    };

    if user.role != Role::Admin {
        return AppError::Forbidden.into_response();
    }

    next.run(Request::from_parts(parts, body)).await
}
