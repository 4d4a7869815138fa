use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::{Notification, NotificationKind};

/// Insert a notification inside an open database transaction so it commits
/// or rolls back together with the event that caused it.
pub async fn insert(
    conn: &mut PgConnection,
    user_id: Uuid,
    kind: &NotificationKind,
) -> Result<Notification, sqlx::Error> {
    let payload = serde_json::to_value(kind)
        .map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

    sqlx::query_as::<_, Notification>(
        r#"
        INSERT INTO notifications (user_id, payload)
        VALUES ($1, $2)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(payload)
    .fetch_one(conn)
    .await
}

pub async fn list_by_user(
    pool: &PgPool,
    user_id: Uuid,
    limit: i64,
) -> anyhow::Result<Vec<Notification>> {
    let rows = sqlx::query_as::<_, Notification>(
        "SELECT * FROM notifications WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2",
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Mark one of the user's notifications read. Returns false when the row
/// does not exist or belongs to someone else.
pub async fn mark_read(pool: &PgPool, id: Uuid, user_id: Uuid) -> anyhow::Result<bool> {
    let result = sqlx::query(
        "UPDATE notifications SET is_read = TRUE WHERE id = $1 AND user_id = $2",
    )
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn unread_count(pool: &PgPool, user_id: Uuid) -> anyhow::Result<i64> {
    let row: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND NOT is_read",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(row.0)
}
