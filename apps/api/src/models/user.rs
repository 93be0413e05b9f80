use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// A live session joined with its owner.
#[derive(Debug, Clone, FromRow)]
pub struct SessionRow {
    pub token: Uuid,
    pub user_id: Uuid,
    pub username: String,
}
