use argon2::password_hash::{PasswordHashString, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Role;

/// Bearer-token claims. `jti` keys the session row that makes the token
/// revocable before `exp`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub role: Role,
    pub jti: Uuid,
    pub exp: i64,
}

impl Claims {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut rand::rngs::OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.serialize().to_string())
}

/// Argon2 verification is CPU-bound; run it off the async executor.
pub async fn verify_password(password: &str, stored_hash: &str) -> bool {
    let password = password.as_bytes().to_owned();
    let Ok(phs) = PasswordHashString::new(stored_hash) else {
        return false;
    };

    tokio::task::spawn_blocking(move || {
        Argon2::default()
            .verify_password(&password, &phs.password_hash())
            .is_ok()
    })
    .await
    .unwrap_or(false)
}

/// Issue a signed token with a fixed expiry. Returns the token string and
/// the claims that went into it (the caller persists the session row).
pub fn issue_token(
    secret: &str,
    user_id: Uuid,
    role: Role,
    expiry_secs: i64,
) -> Result<(String, Claims), jsonwebtoken::errors::Error> {
    let expires_at = Utc::now() + Duration::seconds(expiry_secs);
    let claims = Claims {
        sub: user_id,
        role,
        jti: Uuid::new_v4(),
        exp: expires_at.timestamp(),
    };

    let token = jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok((token, claims))
}

pub fn decode_token(secret: &str, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let data = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;

    Ok(data.claims)
}

pub fn expiry_time(claims: &Claims) -> DateTime<Utc> {
    DateTime::from_timestamp(claims.exp, 0).unwrap_or_else(Utc::now)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hash = hash_password("hunter2").unwrap();
        assert!(hash.starts_with("$argon2"));

        let rt = tokio::runtime::Runtime::new().unwrap();
        assert!(rt.block_on(verify_password("hunter2", &hash)));
        assert!(!rt.block_on(verify_password("wrong", &hash)));
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        assert!(!rt.block_on(verify_password("hunter2", "not-a-phc-string")));
    }

    #[test]
    fn test_token_roundtrip() {
        let user_id = Uuid::new_v4();
        let (token, claims) = issue_token("secret", user_id, Role::Admin, 3600).unwrap();

        let decoded = decode_token("secret", &token).unwrap();
        assert_eq!(decoded.sub, user_id);
        assert_eq!(decoded.jti, claims.jti);
        assert!(decoded.is_admin());
    }

    #[test]
    fn test_token_wrong_secret_rejected() {
        let (token, _) = issue_token("secret-a", Uuid::new_v4(), Role::User, 3600).unwrap();
        assert!(decode_token("secret-b", &token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let (token, _) = issue_token("secret", Uuid::new_v4(), Role::User, -3600).unwrap();
        assert!(decode_token("secret", &token).is_err());
    }
}
