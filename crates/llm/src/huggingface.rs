//! Hugging Face inference API adapter (text-to-text grammar model)

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use rectifai_core::{CorrectionResult, ProviderKind};

use crate::prompt::{huggingface_input, strip_instruction};
use crate::provider::{finish, parse, read_json, CorrectionProvider, ProviderSettings};
use crate::LlmError;

const MAX_LENGTH_CAP: usize = 512;

#[derive(Debug, Serialize)]
struct InferenceRequest {
    inputs: String,
    parameters: InferenceParameters,
}

#[derive(Debug, Serialize)]
struct InferenceParameters {
    max_length: usize,
    temperature: f32,
    do_sample: bool,
}

#[derive(Debug, Deserialize)]
struct Generation {
    #[serde(default)]
    generated_text: Option<String>,
}

/// The API answers with either a list of generations or a single one
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Batch(Vec<Generation>),
    Single(Generation),
}

impl InferenceResponse {
    fn into_text(self) -> Option<String> {
        match self {
            InferenceResponse::Batch(items) => items.into_iter().next()?.generated_text,
            InferenceResponse::Single(item) => item.generated_text,
        }
    }
}

pub struct HuggingFaceProvider {
    settings: ProviderSettings,
    client: Client,
}

impl HuggingFaceProvider {
    pub fn new(settings: ProviderSettings) -> Result<Self, LlmError> {
        let client = settings.build_client()?;
        Ok(Self { settings, client })
    }
}

#[async_trait]
impl CorrectionProvider for HuggingFaceProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::HuggingFace
    }

    fn is_configured(&self) -> bool {
        self.settings.is_configured()
    }

    async fn correct(&self, input: &str) -> Result<CorrectionResult, LlmError> {
        let token = self.settings.ensure_configured()?;

        let request = InferenceRequest {
            inputs: huggingface_input(input),
            parameters: InferenceParameters {
                max_length: (input.chars().count() * 2).clamp(1, MAX_LENGTH_CAP),
                temperature: 0.3,
                do_sample: true,
            },
        };

        let response = self
            .client
            .post(format!(
                "{}/models/{}",
                self.settings.endpoint, self.settings.model
            ))
            .bearer_auth(token)
            .json(&request)
            .send()
            .await?;

        let body: InferenceResponse = parse(read_json(response).await?)?;
        let generated = body
            .into_text()
            .ok_or_else(|| LlmError::InvalidResponse("missing generated_text".to_string()))?;

        finish(ProviderKind::HuggingFace, input, strip_instruction(&generated)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer) -> HuggingFaceProvider {
        HuggingFaceProvider::new(
            ProviderSettings::new(ProviderKind::HuggingFace)
                .with_api_key("hf_test")
                .with_endpoint(server.uri()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_batch_response_with_echoed_instruction() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/grammarly/coedit-large"))
            .and(header("authorization", "Bearer hf_test"))
            .and(body_partial_json(json!({
                "inputs": "Fix grammar and improve this text: she go home",
                "parameters": {"max_length": 22, "do_sample": true}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"generated_text": "Fix grammar and improve this text: She goes home."}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let result = provider(&server).correct("she go home").await.unwrap();
        assert_eq!(result.corrected, "She goes home.");
        assert!((0.75..=0.95).contains(&result.confidence));
        assert!(result.changes.types.contains(&"grammar enhancement".to_string()));
    }

    #[tokio::test]
    async fn test_single_object_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"generated_text": "Hello."})),
            )
            .mount(&server)
            .await;

        let result = provider(&server).correct("hello").await.unwrap();
        assert_eq!(result.corrected, "Hello.");
    }

    #[tokio::test]
    async fn test_model_loading_is_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_json(json!({
                "error": "Model grammarly/coedit-large is currently loading",
                "estimated_time": 20.0
            })))
            .mount(&server)
            .await;

        let err = provider(&server).correct("hello").await.unwrap_err();
        assert!(matches!(err, LlmError::Api { status: 503, .. }));
        assert!(err.to_string().contains("currently loading"));
    }
}
