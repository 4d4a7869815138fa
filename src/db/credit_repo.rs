use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::{CarbonCredit, CreditStatus};

/// Create a new listing owned by the seller.
#[allow(clippy::too_many_arguments)]
pub async fn insert_credit(
    pool: &PgPool,
    project_name: &str,
    description: Option<&str>,
    vintage_year: i32,
    standard: &str,
    amount: Decimal,
    co2_reduction: Decimal,
    price: Decimal,
    owner_id: Uuid,
    token_id: Option<&str>,
) -> anyhow::Result<CarbonCredit> {
    let credit = sqlx::query_as::<_, CarbonCredit>(
        r#"
        INSERT INTO carbon_credits
            (project_name, description, vintage_year, standard, amount,
             co2_reduction, price, status, owner_id, token_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7, 'AVAILABLE', $8, $9)
        RETURNING *
        "#,
    )
    .bind(project_name)
    .bind(description)
    .bind(vintage_year)
    .bind(standard)
    .bind(amount)
    .bind(co2_reduction)
    .bind(price)
    .bind(owner_id)
    .bind(token_id)
    .fetch_one(pool)
    .await?;

    Ok(credit)
}

pub async fn get_by_id(pool: &PgPool, id: Uuid) -> anyhow::Result<Option<CarbonCredit>> {
    let credit = sqlx::query_as::<_, CarbonCredit>("SELECT * FROM carbon_credits WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(credit)
}

/// List credits, optionally filtered by status.
pub async fn list(
    pool: &PgPool,
    status: Option<&str>,
) -> anyhow::Result<Vec<CarbonCredit>> {
    let credits = match status {
        Some(s) => {
            sqlx::query_as::<_, CarbonCredit>(
                "SELECT * FROM carbon_credits WHERE status = $1 ORDER BY created_at DESC",
            )
            .bind(s)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, CarbonCredit>(
                "SELECT * FROM carbon_credits ORDER BY created_at DESC",
            )
            .fetch_all(pool)
            .await?
        }
    };

    Ok(credits)
}

pub async fn list_by_owner(pool: &PgPool, owner_id: Uuid) -> anyhow::Result<Vec<CarbonCredit>> {
    let credits = sqlx::query_as::<_, CarbonCredit>(
        "SELECT * FROM carbon_credits WHERE owner_id = $1 ORDER BY created_at DESC",
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await?;

    Ok(credits)
}

/// Lock a credit row for the duration of the enclosing transaction.
pub async fn lock_by_id(
    conn: &mut PgConnection,
    id: Uuid,
) -> Result<Option<CarbonCredit>, sqlx::Error> {
    sqlx::query_as::<_, CarbonCredit>("SELECT * FROM carbon_credits WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(conn)
        .await
}

/// Full purchase: flip to SOLD and hand ownership to the buyer.
pub async fn mark_sold(
    conn: &mut PgConnection,
    id: Uuid,
    buyer_id: Uuid,
) -> Result<CarbonCredit, sqlx::Error> {
    sqlx::query_as::<_, CarbonCredit>(
        r#"
        UPDATE carbon_credits
        SET status = 'SOLD', owner_id = $2, version = version + 1, updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(buyer_id)
    .fetch_one(conn)
    .await
}

/// Partial purchase: shrink the seller's remainder in place.
pub async fn decrement_amount(
    conn: &mut PgConnection,
    id: Uuid,
    purchased: Decimal,
    co2_purchased: Decimal,
) -> Result<CarbonCredit, sqlx::Error> {
    sqlx::query_as::<_, CarbonCredit>(
        r#"
        UPDATE carbon_credits
        SET amount = amount - $2,
            co2_reduction = co2_reduction - $3,
            version = version + 1,
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(purchased)
    .bind(co2_purchased)
    .fetch_one(conn)
    .await
}

/// Insert the buyer's slice of a split credit. The new row carries the
/// parent's project fields and a prorated co2_reduction.
pub async fn insert_split(
    conn: &mut PgConnection,
    parent: &CarbonCredit,
    buyer_id: Uuid,
    amount: Decimal,
    co2_reduction: Decimal,
) -> Result<CarbonCredit, sqlx::Error> {
    sqlx::query_as::<_, CarbonCredit>(
        r#"
        INSERT INTO carbon_credits
            (project_name, description, vintage_year, standard, amount,
             co2_reduction, price, status, owner_id, token_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7, 'SOLD', $8, $9)
        RETURNING *
        "#,
    )
    .bind(&parent.project_name)
    .bind(&parent.description)
    .bind(parent.vintage_year)
    .bind(&parent.standard)
    .bind(amount)
    .bind(co2_reduction)
    .bind(parent.price)
    .bind(buyer_id)
    .bind(&parent.token_id)
    .fetch_one(conn)
    .await
}

pub async fn set_status(
    conn: &mut PgConnection,
    id: Uuid,
    status: CreditStatus,
) -> Result<CarbonCredit, sqlx::Error> {
    sqlx::query_as::<_, CarbonCredit>(
        r#"
        UPDATE carbon_credits
        SET status = $2, version = version + 1, updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(status.as_str())
    .fetch_one(conn)
    .await
}

pub async fn count_available(pool: &PgPool) -> anyhow::Result<i64> {
    let row: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM carbon_credits WHERE status = 'AVAILABLE'")
            .fetch_one(pool)
            .await?;

    Ok(row.0)
}
