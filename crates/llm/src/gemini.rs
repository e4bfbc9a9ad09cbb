//! Google Gemini `generateContent` adapter

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use rectifai_core::{CorrectionResult, ProviderKind};

use crate::prompt::single_prompt;
use crate::provider::{finish, parse, read_json, CorrectionProvider, ProviderSettings};
use crate::LlmError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_k: u32,
    top_p: f32,
    max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.3,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 8192,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

pub struct GeminiProvider {
    settings: ProviderSettings,
    client: Client,
}

impl GeminiProvider {
    pub fn new(settings: ProviderSettings) -> Result<Self, LlmError> {
        let client = settings.build_client()?;
        Ok(Self { settings, client })
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.settings.endpoint, self.settings.model
        )
    }
}

#[async_trait]
impl CorrectionProvider for GeminiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    fn is_configured(&self) -> bool {
        self.settings.is_configured()
    }

    async fn correct(&self, input: &str) -> Result<CorrectionResult, LlmError> {
        let api_key = self.settings.ensure_configured()?;

        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: Some(single_prompt(input)),
                }],
            }],
            generation_config: GenerationConfig::default(),
        };

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await?;

        let body: GeminiResponse = parse(read_json(response).await?)?;

        if let Some(reason) = body.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(LlmError::ProviderReported(format!("prompt blocked: {}", reason)));
        }

        let text: String = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        finish(ProviderKind::Gemini, input, &text).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer) -> GeminiProvider {
        GeminiProvider::new(
            ProviderSettings::new(ProviderKind::Gemini)
                .with_api_key("g-key")
                .with_endpoint(server.uri()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_correct() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
            .and(header("x-goog-api-key", "g-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": {"parts": [{"text": "I received the items.\n"}], "role": "model"}
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let result = provider(&server).correct("i recieve the stuff").await.unwrap();
        assert_eq!(result.corrected, "I received the items.");
        assert!((0.7..=1.0).contains(&result.confidence));
        assert!(!result.changes.types.is_empty());
    }

    #[tokio::test]
    async fn test_blocked_prompt() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [],
                "promptFeedback": {"blockReason": "SAFETY"}
            })))
            .mount(&server)
            .await;

        let err = provider(&server).correct("text").await.unwrap_err();
        assert_eq!(err, LlmError::ProviderReported("prompt blocked: SAFETY".into()));
    }

    #[tokio::test]
    async fn test_no_candidates_is_invalid() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
            .mount(&server)
            .await;

        let err = provider(&server).correct("text").await.unwrap_err();
        assert!(matches!(err, LlmError::InvalidResponse(_)));
    }
}
