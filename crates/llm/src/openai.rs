//! OpenAI-compatible chat completions adapter
//!
//! Serves both OpenAI and Perplexity, which share the `/chat/completions`
//! wire format and differ only in endpoint, model, prompt and token cap.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use rectifai_core::{CorrectionResult, ProviderKind};

use crate::prompt::system_prompt;
use crate::provider::{
    completion_budget, finish, parse, read_json, CorrectionProvider, ProviderSettings,
};
use crate::LlmError;

const TEMPERATURE: f32 = 0.3;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: usize,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
}

impl ChatMessage {
    fn new(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: Some(content.into()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: Option<ChatMessage>,
}

pub struct OpenAiCompatibleProvider {
    settings: ProviderSettings,
    client: Client,
}

impl OpenAiCompatibleProvider {
    /// `settings.kind` must be `OpenAi` or `Perplexity`
    pub fn new(settings: ProviderSettings) -> Result<Self, LlmError> {
        match settings.kind {
            ProviderKind::OpenAi | ProviderKind::Perplexity => {
                let client = settings.build_client()?;
                Ok(Self { settings, client })
            }
            other => Err(LlmError::Configuration(format!(
                "{} does not speak the chat completions protocol",
                other.display_name()
            ))),
        }
    }

    fn max_tokens_cap(&self) -> usize {
        match self.settings.kind {
            ProviderKind::Perplexity => 2000,
            _ => 1000,
        }
    }
}

#[async_trait]
impl CorrectionProvider for OpenAiCompatibleProvider {
    fn kind(&self) -> ProviderKind {
        self.settings.kind
    }

    fn is_configured(&self) -> bool {
        self.settings.is_configured()
    }

    async fn correct(&self, input: &str) -> Result<CorrectionResult, LlmError> {
        let api_key = self.settings.ensure_configured()?;

        let request = ChatRequest {
            model: &self.settings.model,
            messages: vec![
                ChatMessage::new("system", system_prompt(self.kind())),
                ChatMessage::new("user", input),
            ],
            temperature: TEMPERATURE,
            max_tokens: completion_budget(input, self.max_tokens_cap()),
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.settings.endpoint))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let body: ChatResponse = parse(read_json(response).await?)?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .ok_or_else(|| LlmError::InvalidResponse("no choices in response".to_string()))?;

        finish(self.kind(), input, &content).await
    }
}
