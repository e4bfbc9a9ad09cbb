//! HTTP surface tests

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use rectifai_config::{ProvidersConfig, Settings};
use rectifai_core::ProviderKind;
use rectifai_persistence::{
    CorrectionRecord, NewCorrection, NewSubmission, PersistenceError, Submission,
    SubmissionStatus, SubmissionStore,
};
use rectifai_server::{create_router, init_metrics, AppState};

/// Store whose writes always fail
struct BrokenStore;

#[async_trait]
impl SubmissionStore for BrokenStore {
    async fn create_submission(&self, _new: NewSubmission) -> Result<Submission, PersistenceError> {
        Err(PersistenceError::Connection("cluster unreachable".into()))
    }

    async fn create_correction(
        &self,
        _new: NewCorrection,
    ) -> Result<CorrectionRecord, PersistenceError> {
        Err(PersistenceError::Connection("cluster unreachable".into()))
    }

    async fn update_status(
        &self,
        _id: Uuid,
        _status: SubmissionStatus,
    ) -> Result<(), PersistenceError> {
        Err(PersistenceError::Connection("cluster unreachable".into()))
    }

    async fn get_submission(&self, _id: Uuid) -> Result<Option<Submission>, PersistenceError> {
        Ok(None)
    }

    async fn corrections_for(
        &self,
        _submission_id: Uuid,
    ) -> Result<Vec<CorrectionRecord>, PersistenceError> {
        Ok(Vec::new())
    }

    fn backend(&self) -> &'static str {
        "broken"
    }
}

fn app() -> Router {
    create_router(AppState::new(Settings::default()).unwrap())
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or_else(|_| {
        Value::String(String::from_utf8_lossy(&bytes).into_owned())
    });
    (status, body)
}

fn post_correct(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/correct")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn correct_without_providers_uses_rules_and_persists() {
    let app = app();

    let (status, body) = send(app.clone(), post_correct(json!({"input": "i cant go there."}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["corrected"], "I can't go there.");
    assert_eq!(body["source"], "rule_based");
    assert_eq!(body["persisted"], true);
    assert_eq!(body["changes"]["total"], 2);
    let types = body["changes"]["types"].as_array().unwrap();
    assert!(types.contains(&json!("grammar")));
    assert!(types.contains(&json!("capitalization")));

    let id = body["submission_id"].as_str().unwrap().to_string();
    let (status, stored) = send(app, get(&format!("/api/submissions/{}", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored["input_content"], "i cant go there.");
    assert_eq!(stored["input_type"], "text");
    assert_eq!(stored["status"], "completed");
    assert_eq!(stored["corrections"][0]["corrected_content"], "I can't go there.");
    assert_eq!(stored["corrections"][0]["verified"], true);
}

#[tokio::test]
async fn empty_input_is_rejected() {
    for body in [json!({"input": ""}), json!({"input": "  \n "}), json!({})] {
        let (status, response) = send(app(), post_correct(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response, json!({"error": "Input text is required"}));
    }
}

#[tokio::test]
async fn oversized_input_is_rejected() {
    let app = app();

    let (status, response) = send(app.clone(), post_correct(json!({"input": "a".repeat(5_001)}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response, json!({"error": "Input text exceeds 5000 characters"}));

    let (status, _) = send(app, post_correct(json!({"input": "a".repeat(5_000)}))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn input_limit_follows_config() {
    let mut settings = Settings::default();
    settings.server.max_input_chars = 8;
    let app = create_router(AppState::new(settings).unwrap());

    let (status, response) = send(app, post_correct(json!({"input": "teh end teh end"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response, json!({"error": "Input text exceeds 8 characters"}));
}

#[tokio::test]
async fn storage_failure_does_not_block_result() {
    let state = AppState::with_store(Settings::default(), Arc::new(BrokenStore)).unwrap();
    let (status, body) = send(
        create_router(state),
        post_correct(json!({"input": "  too   many   spaces.  "})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["corrected"], "Too many spaces.");
    assert_eq!(body["persisted"], false);
    assert!(body.get("submission_id").is_none());
    assert!(body["changes"]["total"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn configured_providers_are_used_in_order() {
    let openai = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .expect(1)
        .mount(&openai)
        .await;

    let gemini = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{"text": "I can't go there."}]}}]
        })))
        .expect(1)
        .mount(&gemini)
        .await;

    let settings = Settings {
        providers: ProvidersConfig::unconfigured()
            .with_order(vec![ProviderKind::OpenAi, ProviderKind::Gemini])
            .with_api_key(ProviderKind::OpenAi, "sk-test")
            .with_endpoint(ProviderKind::OpenAi, openai.uri())
            .with_api_key(ProviderKind::Gemini, "g-key")
            .with_endpoint(ProviderKind::Gemini, gemini.uri()),
        ..Settings::default()
    };
    let app = create_router(AppState::new(settings).unwrap());

    let (status, body) = send(app.clone(), post_correct(json!({"input": "i cant go there."}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "gemini");
    assert_eq!(body["corrected"], "I can't go there.");

    let (_, providers) = send(app, get("/api/providers")).await;
    assert_eq!(
        providers["providers"],
        json!([
            {"provider": "openai", "name": "OpenAI", "configured": true},
            {"provider": "gemini", "name": "Gemini", "configured": true}
        ])
    );
}

#[tokio::test]
async fn providers_listing_without_credentials() {
    let (status, body) = send(app(), get("/api/providers")).await;
    assert_eq!(status, StatusCode::OK);
    let providers = body["providers"].as_array().unwrap();
    assert_eq!(providers.len(), ProviderKind::ALL.len());
    assert!(providers.iter().all(|p| p["configured"] == false));
    assert_eq!(body["fallback"], "rule_based");
}

#[tokio::test]
async fn unknown_submission_is_not_found() {
    let (status, body) = send(app(), get(&format!("/api/submissions/{}", Uuid::new_v4()))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().starts_with("Not found"));
}

#[tokio::test]
async fn health_and_readiness() {
    let (status, body) = send(app(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = send(app(), get("/ready")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
    assert_eq!(body["persistence"], "memory");
    assert_eq!(body["providers"]["configured"], json!([]));
}

#[tokio::test]
async fn metrics_exposes_correction_counters() {
    assert!(init_metrics().is_some());
    let app = app();

    let (status, _) = send(app.clone(), post_correct(json!({"input": "teh end"}))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(app, get("/metrics")).await;
    assert_eq!(status, StatusCode::OK);
    let text = body.as_str().unwrap();
    assert!(text.contains("rectifai_corrections_total"));
    assert!(text.contains("source=\"rule_based\""));
}
