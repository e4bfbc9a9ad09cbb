//! HTTP Endpoints
//!
//! REST API consumed by the web front end.

use axum::{
    extract::{Json, Path, State},
    http::{header, HeaderValue, Method, StatusCode},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::metrics::metrics_handler;
use crate::service::{CorrectionResponse, SubmissionView};
use crate::state::AppState;
use crate::ServerError;

const DEFAULT_ORIGIN: &str = "http://localhost:3000";

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let cors_layer = build_cors_layer(
        &state.config.server.cors_origins,
        state.config.server.cors_enabled,
    );

    Router::new()
        .route("/api/correct", post(correct))
        .route("/api/providers", get(list_providers))
        .route("/api/submissions/:id", get(get_submission))
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(metrics_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}

/// CORS from configured origins
///
/// - disabled: permissive (development only)
/// - no valid origins: `http://localhost:3000`
fn build_cors_layer(origins: &[String], enabled: bool) -> CorsLayer {
    if !enabled {
        tracing::warn!("CORS is disabled - allowing all origins (NOT FOR PRODUCTION)");
        return CorsLayer::permissive();
    }

    let parsed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!("Invalid CORS origin: {}", origin);
                None
            })
        })
        .collect();

    let parsed_origins = if parsed_origins.is_empty() {
        tracing::info!("No valid CORS origins configured, defaulting to {}", DEFAULT_ORIGIN);
        vec![HeaderValue::from_static(DEFAULT_ORIGIN)]
    } else {
        tracing::info!("CORS configured with {} origins", parsed_origins.len());
        parsed_origins
    };

    CorsLayer::new()
        .allow_origin(parsed_origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

#[derive(Debug, Deserialize)]
struct CorrectRequest {
    /// Missing counts as empty and is rejected like it
    #[serde(default)]
    input: String,
}

async fn correct(
    State(state): State<AppState>,
    Json(request): Json<CorrectRequest>,
) -> Result<Json<CorrectionResponse>, ServerError> {
    let response = state.service.correct(&request.input).await?;
    Ok(Json(response))
}

async fn list_providers(State(state): State<AppState>) -> Json<serde_json::Value> {
    let providers: Vec<_> = state
        .service
        .orchestrator()
        .providers()
        .iter()
        .map(|p| {
            serde_json::json!({
                "provider": p.kind(),
                "name": p.name(),
                "configured": p.is_configured(),
            })
        })
        .collect();

    Json(serde_json::json!({
        "providers": providers,
        "fallback": "rule_based",
    }))
}

async fn get_submission(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SubmissionView>, ServerError> {
    Ok(Json(state.service.submission(id).await?))
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Always ready: the rule-based corrector needs no external service
async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    let orchestrator = state.service.orchestrator();
    let configured = orchestrator.configured_providers();

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "ready",
            "providers": {
                "declared": orchestrator.providers().len(),
                "configured": configured,
            },
            "persistence": state.service.store().backend(),
        })),
    )
}
