//! Submission Store — insert-only persistence for profile + roadmap pairs.
//!
//! `AppState` holds an `Arc<dyn SubmissionStore>` so handlers stay agnostic
//! of the backend; tests swap in `MemorySubmissionStore`.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use crate::errors::AppError;
use crate::models::submission::SubmissionRow;
use crate::roadmap::prompts::Profile;

/// The persistence seam. One operation only: this system never reads,
/// updates, or deletes submissions.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    async fn create(&self, profile: &Profile, roadmap: &str) -> Result<(), AppError>;
}

/// Default backend: one row per submission in the `submissions` table,
/// timestamps assigned by the database.
pub struct PgSubmissionStore {
    pool: PgPool,
}

impl PgSubmissionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubmissionStore for PgSubmissionStore {
    async fn create(&self, profile: &Profile, roadmap: &str) -> Result<(), AppError> {
        let row = sqlx::query_as::<_, SubmissionRow>(
            "INSERT INTO submissions (name, skills, interests, goals, roadmap) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(&profile.name)
        .bind(&profile.skills)
        .bind(&profile.interests)
        .bind(&profile.goals)
        .bind(roadmap)
        .fetch_one(&self.pool)
        .await?;

        debug!("Submission saved (id={})", row.id);
        Ok(())
    }
}

/// Recording test double used by the end-to-end handler tests.
#[cfg(test)]
#[derive(Default)]
pub struct MemorySubmissionStore {
    pub records: std::sync::Mutex<Vec<(Profile, String)>>,
}

#[cfg(test)]
#[async_trait]
impl SubmissionStore for MemorySubmissionStore {
    async fn create(&self, profile: &Profile, roadmap: &str) -> Result<(), AppError> {
        self.records
            .lock()
            .unwrap()
            .push((profile.clone(), roadmap.to_string()));
        Ok(())
    }
}
