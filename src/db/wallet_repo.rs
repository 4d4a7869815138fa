use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::Wallet;

/// Create a wallet for a user. One wallet per (user, currency).
pub async fn create_wallet(
    pool: &PgPool,
    user_id: Uuid,
    currency: &str,
) -> anyhow::Result<Wallet> {
    let wallet = sqlx::query_as::<_, Wallet>(
        r#"
        INSERT INTO wallets (user_id, currency)
        VALUES ($1, $2)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(currency)
    .fetch_one(pool)
    .await?;

    Ok(wallet)
}

pub async fn get_by_user(pool: &PgPool, user_id: Uuid) -> anyhow::Result<Option<Wallet>> {
    let wallet = sqlx::query_as::<_, Wallet>(
        "SELECT * FROM wallets WHERE user_id = $1 ORDER BY created_at LIMIT 1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(wallet)
}

/// Lock the user's wallet row for the duration of the enclosing transaction.
pub async fn lock_by_user(
    conn: &mut PgConnection,
    user_id: Uuid,
) -> Result<Option<Wallet>, sqlx::Error> {
    sqlx::query_as::<_, Wallet>(
        "SELECT * FROM wallets WHERE user_id = $1 ORDER BY created_at LIMIT 1 FOR UPDATE",
    )
    .bind(user_id)
    .fetch_optional(conn)
    .await
}

/// Lock a wallet row by id for the duration of the enclosing transaction.
pub async fn lock_by_id(
    conn: &mut PgConnection,
    wallet_id: Uuid,
) -> Result<Option<Wallet>, sqlx::Error> {
    sqlx::query_as::<_, Wallet>("SELECT * FROM wallets WHERE id = $1 FOR UPDATE")
        .bind(wallet_id)
        .fetch_optional(conn)
        .await
}

/// Apply a signed delta to a locked wallet's balance. The caller must hold
/// the row lock; the CHECK constraint still rejects a negative result.
pub async fn apply_delta(
    conn: &mut PgConnection,
    wallet_id: Uuid,
    delta: Decimal,
) -> Result<Wallet, sqlx::Error> {
    sqlx::query_as::<_, Wallet>(
        r#"
        UPDATE wallets
        SET balance = balance + $2, updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(wallet_id)
    .bind(delta)
    .fetch_one(conn)
    .await
}
