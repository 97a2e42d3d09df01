//! Axum route handlers for the Roadmap API.

use axum::{extract::State, Json};
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::roadmap::normalizer::{normalize, RoadmapData};
use crate::roadmap::prompts::{build_prompt, Profile};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub roadmap: String,
    #[serde(rename = "roadmapData")]
    pub roadmap_data: RoadmapData,
}

/// POST /api/roadmap/generate
///
/// Full pipeline: prompt build → completion call → normalization →
/// submission insert. The insert happens only after normalization
/// succeeds, so a stored row always carries a complete roadmap.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(profile): Json<Profile>,
) -> Result<Json<GenerateResponse>, AppError> {
    info!("Generating roadmap for {}", profile.name);

    let prompt = build_prompt(&profile);
    let raw = state.llm.complete(&prompt).await?;
    let normalized = normalize(&raw)?;

    state.store.create(&profile, &normalized.text).await?;

    Ok(Json(GenerateResponse {
        roadmap: normalized.text,
        roadmap_data: normalized.data,
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use httpmock::prelude::*;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::llm_client::CompletionClient;
    use crate::routes::build_router;
    use crate::state::AppState;
    use crate::store::MemorySubmissionStore;

    fn test_state(server: &MockServer) -> (AppState, Arc<MemorySubmissionStore>) {
        let store = Arc::new(MemorySubmissionStore::default());
        let state = AppState {
            llm: CompletionClient::new(
                server.url("/openai/v1/chat/completions"),
                "gsk_test".to_string(),
            ),
            store: store.clone(),
        };
        (state, store)
    }

    fn ann() -> Value {
        json!({"name": "Ann", "skills": "Go", "interests": "infra", "goals": "SRE role"})
    }

    async fn post_generate(state: AppState, body: &Value) -> (StatusCode, Value) {
        let response = build_router(state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/roadmap/generate")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn stub_completion(server: &MockServer, content: &str) {
        let body = json!({"choices": [{"message": {"content": content}}]});
        server.mock(|when, then| {
            when.method(POST).path("/openai/v1/chat/completions");
            then.status(200).json_body(body.clone());
        });
    }

    #[tokio::test]
    async fn test_generate_returns_structured_roadmap_and_persists() {
        let server = MockServer::start();
        stub_completion(
            &server,
            r#"{"summary": "Plan", "weeklyPlan": ["study"], "phases": [{"title": "Foundations"}]}"#,
        );
        let (state, store) = test_state(&server);

        let (status, body) = post_generate(state, &ann()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["roadmapData"]["phases"].as_array().unwrap().len(), 1);
        let roadmap = body["roadmap"].as_str().unwrap();
        assert!(!roadmap.is_empty());
        assert!(roadmap.contains("Foundations"));

        let records = store.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].0.name, "Ann");
        assert_eq!(records[0].1, roadmap);
    }

    #[tokio::test]
    async fn test_generate_maps_upstream_401_to_401() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/openai/v1/chat/completions");
            then.status(401)
                .json_body(json!({"error": {"message": "Unauthorized"}}));
        });
        let (state, store) = test_state(&server);

        let (status, body) = post_generate(state, &ann()).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body["error"].as_str().unwrap().contains("Invalid GROQ_API_KEY"));
        assert!(store.records.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_generate_maps_unparseable_completion_to_500() {
        let server = MockServer::start();
        stub_completion(&server, "hello, no json here");
        let (state, store) = test_state(&server);

        let (status, body) = post_generate(state, &ann()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "could not parse AI response");
        assert!(store.records.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_generate_maps_empty_phases_to_500() {
        let server = MockServer::start();
        stub_completion(&server, r#"{"summary": "Plan", "phases": []}"#);
        let (state, store) = test_state(&server);

        let (status, body) = post_generate(state, &ann()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "could not build a structured roadmap");
        assert!(store.records.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_generate_surfaces_upstream_error_message_as_500() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/openai/v1/chat/completions");
            then.status(503)
                .json_body(json!({"error": {"message": "model overloaded"}}));
        });
        let (state, store) = test_state(&server);

        let (status, body) = post_generate(state, &ann()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "model overloaded");
        assert!(store.records.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_generate_handles_fenced_completion() {
        let server = MockServer::start();
        stub_completion(
            &server,
            "```json\n{\"summary\":\"x\",\"phases\":[{\"title\":\"A\"}]}\n```",
        );
        let (state, _store) = test_state(&server);

        let (status, body) = post_generate(state, &ann()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["roadmapData"]["summary"], "x");
        assert_eq!(body["roadmapData"]["phases"][0]["title"], "A");
        assert_eq!(body["roadmapData"]["phases"][0]["duration"], "2-4 weeks");
    }

    #[tokio::test]
    async fn test_health_check_root() {
        let server = MockServer::start();
        let (state, _store) = test_state(&server);

        let response = build_router(state)
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["ok"], true);
        assert_eq!(body["docs"], "POST /api/roadmap/generate");
    }
}
