//! Anthropic Messages API adapter

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use rectifai_core::{CorrectionResult, ProviderKind};

use crate::prompt::single_prompt;
use crate::provider::{finish, parse, read_json, CorrectionProvider, ProviderSettings};
use crate::LlmError;

const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: usize = 4096;
const TEMPERATURE: f32 = 0.2;
const TOP_P: f32 = 0.9;

#[derive(Debug, Serialize)]
struct ClaudeRequest<'a> {
    model: &'a str,
    max_tokens: usize,
    temperature: f32,
    top_p: f32,
    messages: Vec<ClaudeMessage>,
}

#[derive(Debug, Serialize)]
struct ClaudeMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ClaudeApiResponse {
    #[serde(default)]
    content: Vec<ClaudeContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ClaudeContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: Option<String>,
}

impl ClaudeApiResponse {
    fn text(&self) -> String {
        self.content
            .iter()
            .filter(|b| b.block_type == "text")
            .filter_map(|b| b.text.as_deref())
            .collect()
    }
}

/// Direct Claude access with a caller-held API key
pub struct ClaudeProvider {
    settings: ProviderSettings,
    client: Client,
}

impl ClaudeProvider {
    pub fn new(settings: ProviderSettings) -> Result<Self, LlmError> {
        let client = settings.build_client()?;
        Ok(Self { settings, client })
    }
}

#[async_trait]
impl CorrectionProvider for ClaudeProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Claude
    }

    fn is_configured(&self) -> bool {
        self.settings.is_configured()
    }

    async fn correct(&self, input: &str) -> Result<CorrectionResult, LlmError> {
        let api_key = self.settings.ensure_configured()?;

        let request = ClaudeRequest {
            model: &self.settings.model,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            top_p: TOP_P,
            messages: vec![ClaudeMessage {
                role: "user",
                content: single_prompt(input),
            }],
        };

        let response = self
            .client
            .post(format!("{}/v1/messages", self.settings.endpoint))
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await?;

        let body: ClaudeApiResponse = parse(read_json(response).await?)?;
        finish(ProviderKind::Claude, input, &body.text()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer) -> ClaudeProvider {
        ClaudeProvider::new(
            ProviderSettings::new(ProviderKind::Claude)
                .with_api_key("sk-ant-test")
                .with_endpoint(server.uri()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_correct_joins_text_blocks() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "sk-ant-test"))
            .and(header("anthropic-version", ANTHROPIC_VERSION))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "content": [
                    {"type": "text", "text": "I can't "},
                    {"type": "text", "text": "go there."}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let result = provider(&server).correct("i cant go there.").await.unwrap();
        assert_eq!(result.corrected, "I can't go there.");
        assert_eq!(result.changes.total, 2);
        assert!((0.85..=1.0).contains(&result.confidence));
    }

    #[tokio::test]
    async fn test_empty_content_is_invalid() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"content": []})))
            .mount(&server)
            .await;

        let err = provider(&server).correct("text").await.unwrap_err();
        assert!(matches!(err, LlmError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_rate_limit() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "type": "error",
                "error": {"type": "rate_limit_error", "message": "Too many requests"}
            })))
            .mount(&server)
            .await;

        let err = provider(&server).correct("text").await.unwrap_err();
        assert!(err.is_rate_limited());
        assert!(err.to_string().contains("Too many requests"));
    }

    #[tokio::test]
    async fn test_one_client_serves_every_call() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "content": [{"type": "text", "text": "Hello."}]
            })))
            .expect(3)
            .mount(&server)
            .await;

        let provider = provider(&server);
        for _ in 0..3 {
            assert_eq!(provider.correct("hello").await.unwrap().corrected, "Hello.");
        }
    }

    #[test]
    fn test_constructor_builds_client_with_timeout() {
        let settings = ProviderSettings::new(ProviderKind::Claude)
            .with_api_key("sk-ant")
            .with_timeout(std::time::Duration::from_secs(5));
        let provider = ClaudeProvider::new(settings).unwrap();
        assert!(provider.is_configured());
    }
}
