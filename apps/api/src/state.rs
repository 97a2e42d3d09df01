use std::sync::Arc;

use crate::llm_client::CompletionClient;
use crate::store::SubmissionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub llm: CompletionClient,
    /// Pluggable submission store. Default: PgSubmissionStore.
    pub store: Arc<dyn SubmissionStore>,
}
