use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Record a session for an issued token. The jti is the JWT's id claim;
/// deleting the row revokes the token before its expiry.
pub async fn insert_session(
    pool: &PgPool,
    jti: Uuid,
    user_id: Uuid,
    expires_at: DateTime<Utc>,
) -> anyhow::Result<()> {
    sqlx::query("INSERT INTO sessions (jti, user_id, expires_at) VALUES ($1, $2, $3)")
        .bind(jti)
        .bind(user_id)
        .bind(expires_at)
        .execute(pool)
        .await?;

    Ok(())
}

/// A token is live while its session row exists and has not expired.
pub async fn is_live(pool: &PgPool, jti: Uuid) -> anyhow::Result<bool> {
    let row: (bool,) = sqlx::query_as(
        "SELECT EXISTS(SELECT 1 FROM sessions WHERE jti = $1 AND expires_at > NOW())",
    )
    .bind(jti)
    .fetch_one(pool)
    .await?;

    Ok(row.0)
}

pub async fn delete_session(pool: &PgPool, jti: Uuid) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM sessions WHERE jti = $1")
        .bind(jti)
        .execute(pool)
        .await?;

    Ok(())
}
