pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::roadmap::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::health_handler))
        .route("/api/roadmap/generate", post(handlers::handle_generate))
        .with_state(state)
}
