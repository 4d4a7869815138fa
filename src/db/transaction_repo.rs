use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::{Transaction, TxStatus, TxType};

/// Insert a ledger row inside an open database transaction.
#[allow(clippy::too_many_arguments)]
pub async fn insert(
    conn: &mut PgConnection,
    tx_type: TxType,
    amount: Decimal,
    price: Option<Decimal>,
    total: Decimal,
    status: TxStatus,
    user_id: Uuid,
    wallet_id: Uuid,
    credit_id: Option<Uuid>,
) -> Result<Transaction, sqlx::Error> {
    sqlx::query_as::<_, Transaction>(
        r#"
        INSERT INTO transactions (tx_type, amount, price, total, status, user_id, wallet_id, credit_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(tx_type.as_str())
    .bind(amount)
    .bind(price)
    .bind(total)
    .bind(status.as_str())
    .bind(user_id)
    .bind(wallet_id)
    .bind(credit_id)
    .fetch_one(conn)
    .await
}

/// Lock a ledger row for settlement.
pub async fn lock_by_id(
    conn: &mut PgConnection,
    id: Uuid,
) -> Result<Option<Transaction>, sqlx::Error> {
    sqlx::query_as::<_, Transaction>("SELECT * FROM transactions WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(conn)
        .await
}

/// Administrative status override. The only legal caller is the withdrawal
/// settlement flow (PENDING → COMPLETED/CANCELLED).
pub async fn set_status(
    conn: &mut PgConnection,
    id: Uuid,
    status: TxStatus,
) -> Result<Transaction, sqlx::Error> {
    sqlx::query_as::<_, Transaction>(
        "UPDATE transactions SET status = $2 WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(status.as_str())
    .fetch_one(conn)
    .await
}

/// A user's ledger history, newest first.
pub async fn list_by_user(
    pool: &PgPool,
    user_id: Uuid,
    limit: i64,
) -> anyhow::Result<Vec<Transaction>> {
    let txs = sqlx::query_as::<_, Transaction>(
        "SELECT * FROM transactions WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2",
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(txs)
}

/// Most recent completed BUY price, if any trade has ever happened.
pub async fn last_trade_price(pool: &PgPool) -> anyhow::Result<Option<Decimal>> {
    let row: Option<(Option<Decimal>,)> = sqlx::query_as(
        r#"
        SELECT price FROM transactions
        WHERE tx_type = 'BUY' AND status = 'COMPLETED' AND price IS NOT NULL
        ORDER BY created_at DESC
        LIMIT 1
        "#,
    )
    .fetch_optional(pool)
    .await?;

    Ok(row.and_then(|r| r.0))
}

pub async fn total_traded_volume(pool: &PgPool) -> anyhow::Result<Decimal> {
    let row: (Option<Decimal>,) = sqlx::query_as(
        "SELECT COALESCE(SUM(total), 0) FROM transactions WHERE tx_type = 'BUY' AND status = 'COMPLETED'",
    )
    .fetch_one(pool)
    .await?;

    Ok(row.0.unwrap_or(Decimal::ZERO))
}
