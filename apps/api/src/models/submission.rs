use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One persisted submission: the original profile plus the rendered roadmap
/// text. Created once, never mutated or read back by this service.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SubmissionRow {
    pub id: Uuid,
    pub name: String,
    pub skills: String,
    pub interests: String,
    pub goals: String,
    pub roadmap: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
