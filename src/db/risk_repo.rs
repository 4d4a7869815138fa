use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Risk;

#[allow(clippy::too_many_arguments)]
pub async fn insert_risk(
    pool: &PgPool,
    title: &str,
    description: Option<&str>,
    category: &str,
    likelihood: i32,
    impact: i32,
    severity_score: i32,
    mitigation: Option<&str>,
) -> anyhow::Result<Risk> {
    let risk = sqlx::query_as::<_, Risk>(
        r#"
        INSERT INTO risks (title, description, category, likelihood, impact, severity_score, mitigation)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(title)
    .bind(description)
    .bind(category)
    .bind(likelihood)
    .bind(impact)
    .bind(severity_score)
    .bind(mitigation)
    .fetch_one(pool)
    .await?;

    Ok(risk)
}

pub async fn get_by_id(pool: &PgPool, id: Uuid) -> anyhow::Result<Option<Risk>> {
    let risk = sqlx::query_as::<_, Risk>("SELECT * FROM risks WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(risk)
}

pub async fn list_risks(pool: &PgPool) -> anyhow::Result<Vec<Risk>> {
    let risks = sqlx::query_as::<_, Risk>(
        "SELECT * FROM risks ORDER BY severity_score DESC, created_at DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(risks)
}

#[allow(clippy::too_many_arguments)]
pub async fn update_risk(
    pool: &PgPool,
    id: Uuid,
    title: &str,
    description: Option<&str>,
    category: &str,
    likelihood: i32,
    impact: i32,
    severity_score: i32,
    status: &str,
    mitigation: Option<&str>,
) -> anyhow::Result<Option<Risk>> {
    let risk = sqlx::query_as::<_, Risk>(
        r#"
        UPDATE risks
        SET title = $2, description = $3, category = $4, likelihood = $5,
            impact = $6, severity_score = $7, status = $8, mitigation = $9,
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(title)
    .bind(description)
    .bind(category)
    .bind(likelihood)
    .bind(impact)
    .bind(severity_score)
    .bind(status)
    .bind(mitigation)
    .fetch_optional(pool)
    .await?;

    Ok(risk)
}

pub async fn delete_risk(pool: &PgPool, id: Uuid) -> anyhow::Result<bool> {
    let result = sqlx::query("DELETE FROM risks WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// (status, count) pairs plus the overall average severity.
pub async fn summary(pool: &PgPool) -> anyhow::Result<(Vec<(String, i64)>, f64)> {
    let by_status: Vec<(String, i64)> = sqlx::query_as(
        "SELECT status, COUNT(*) FROM risks GROUP BY status ORDER BY status",
    )
    .fetch_all(pool)
    .await?;

    let avg: (Option<f64>,) = sqlx::query_as(
        "SELECT AVG(severity_score)::float8 FROM risks",
    )
    .fetch_one(pool)
    .await?;

    Ok((by_status, avg.0.unwrap_or(0.0)))
}
