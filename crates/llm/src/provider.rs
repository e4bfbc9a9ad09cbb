//! Provider abstraction shared by every adapter

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

use rectifai_config::ProvidersConfig;
use rectifai_core::{CorrectionResult, ProviderKind};
use rectifai_text_processing::assess;

use crate::LlmError;

/// One external correction service
///
/// `correct` performs exactly one outbound request and never retries;
/// moving on to the next provider is the orchestrator's job.
#[async_trait]
pub trait CorrectionProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Whether a credential (and endpoint, where required) is present
    fn is_configured(&self) -> bool;

    async fn correct(&self, input: &str) -> Result<CorrectionResult, LlmError>;

    fn name(&self) -> &'static str {
        self.kind().display_name()
    }
}

/// Connection settings for one adapter
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderSettings {
    pub kind: ProviderKind,
    pub api_key: Option<String>,
    /// Base URL, without trailing slash
    pub endpoint: String,
    pub model: String,
    /// `None` keeps the HTTP client's default behaviour
    pub timeout: Option<Duration>,
}

impl ProviderSettings {
    /// Unconfigured settings with default endpoint and model
    pub fn new(kind: ProviderKind) -> Self {
        Self {
            kind,
            api_key: None,
            endpoint: ProvidersConfig::default_endpoint(kind).to_string(),
            model: ProvidersConfig::default_model(kind).to_string(),
            timeout: None,
        }
    }

    /// Settings for `kind` as declared in the providers configuration
    pub fn from_config(kind: ProviderKind, config: &ProvidersConfig) -> Self {
        let timeout = config.request_timeout_secs.map(Duration::from_secs);

        match config.resolve(kind) {
            Some(resolved) => Self {
                kind,
                api_key: Some(resolved.api_key),
                endpoint: resolved.endpoint,
                model: resolved.model,
                timeout,
            },
            None => Self {
                timeout,
                ..Self::new(kind)
            },
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn is_configured(&self) -> bool {
        self.credential().is_ok() && !self.endpoint.trim().is_empty()
    }

    /// The API key, or `Unconfigured` when absent or empty
    pub fn credential(&self) -> Result<&str, LlmError> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(LlmError::Unconfigured(self.kind))
    }

    /// Fail with `Unconfigured` unless both credential and endpoint are set
    pub(crate) fn ensure_configured(&self) -> Result<&str, LlmError> {
        let key = self.credential()?;
        if self.endpoint.trim().is_empty() {
            return Err(LlmError::Unconfigured(self.kind));
        }
        Ok(key)
    }

    pub(crate) fn build_client(&self) -> Result<Client, LlmError> {
        let mut builder = Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        builder
            .build()
            .map_err(|e| LlmError::Configuration(e.to_string()))
    }
}

/// Check status and error payload, returning the JSON body
pub(crate) async fn read_json(response: Response) -> Result<Value, LlmError> {
    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<Value>(&error_text)
            .ok()
            .and_then(|body| reported_error(&body))
            .unwrap_or(error_text);
        return Err(LlmError::api(status.as_u16(), message));
    }

    let body: Value = response
        .json()
        .await
        .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

    if let Some(message) = reported_error(&body) {
        return Err(LlmError::ProviderReported(message));
    }

    Ok(body)
}

/// Deserialize a checked body into the provider's response type
pub(crate) fn parse<T: DeserializeOwned>(body: Value) -> Result<T, LlmError> {
    serde_json::from_value(body).map_err(|e| LlmError::InvalidResponse(e.to_string()))
}

/// Extract an `error` field: either a string or `{ "message": ... }`
fn reported_error(body: &Value) -> Option<String> {
    match body.get("error")? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Object(obj) => Some(
            obj.get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string(),
        ),
        other => Some(other.to_string()),
    }
}

/// Trim the provider's text and run the shared analysis on it
pub(crate) async fn finish(
    kind: ProviderKind,
    input: &str,
    corrected: &str,
) -> Result<CorrectionResult, LlmError> {
    let corrected = corrected.trim();
    if corrected.is_empty() {
        return Err(LlmError::InvalidResponse(
            "empty corrected text".to_string(),
        ));
    }
    let (input, corrected) = (input.to_string(), corrected.to_string());
    blocking(move || assess(kind, &input, &corrected)).await
}

/// Run CPU-bound analysis on the blocking pool
///
/// Edit distance is quadratic in the text length and must not stall the
/// async workers.
pub(crate) async fn blocking<F, T>(work: F) -> Result<T, LlmError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| LlmError::Internal(format!("Analysis task failed: {}", e)))
}

/// `min(2 * chars, cap)`, the completion budget used by chat providers
pub(crate) fn completion_budget(input: &str, cap: usize) -> usize {
    (input.chars().count() * 2).clamp(1, cap)
}
