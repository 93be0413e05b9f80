use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// One stored review. Rows are written once and never updated.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub filename: String,
    pub content: String,
    pub score: i32,
    pub feedback: Value,
    pub created_at: DateTime<Utc>,
}

/// History listing row; omits the extracted text.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeHistoryRow {
    pub id: Uuid,
    pub filename: String,
    pub score: i32,
    pub feedback: Value,
    pub created_at: DateTime<Utc>,
}
