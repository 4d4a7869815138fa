use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row for the risks table. `severity_score` is computed at write
/// time as likelihood * impact.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Risk {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub likelihood: i32,
    pub impact: i32,
    pub severity_score: i32,
    pub status: String,
    pub mitigation: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
