//! Claude through the hosted edge function proxy
//!
//! The proxy holds the Anthropic key server-side; clients authenticate with
//! the project's anonymous key and get back a ready-made correction.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use rectifai_config::constants::endpoints::EDGE_FUNCTION_PATH;
use rectifai_core::{CorrectionResult, ProviderKind};
use rectifai_text_processing::levenshtein_distance;

use crate::provider::{blocking, finish, parse, read_json, CorrectionProvider, ProviderSettings};
use crate::LlmError;

#[derive(Debug, Serialize)]
struct EdgeRequest<'a> {
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EdgeResponse {
    #[serde(default)]
    corrected: Option<String>,
    #[serde(default)]
    confidence: Option<serde_json::Value>,
    #[serde(default)]
    changes: Option<serde_json::Value>,
}

impl EdgeResponse {
    fn confidence(&self) -> Option<f64> {
        self.confidence
            .as_ref()
            .and_then(serde_json::Value::as_f64)
            .filter(|c| c.is_finite())
    }

    /// Change labels, only when every entry is a string and there is at least one
    fn labels(&self) -> Option<Vec<String>> {
        let items = self.changes.as_ref()?.as_array()?;
        let labels = items
            .iter()
            .map(|v| v.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()?;
        (!labels.is_empty()).then_some(labels)
    }
}

pub struct EdgeFunctionProvider {
    settings: ProviderSettings,
    client: Client,
}

impl EdgeFunctionProvider {
    pub fn new(settings: ProviderSettings) -> Result<Self, LlmError> {
        let client = settings.build_client()?;
        Ok(Self { settings, client })
    }

    fn url(&self) -> String {
        format!("{}{}", self.settings.endpoint, EDGE_FUNCTION_PATH)
    }
}

#[async_trait]
impl CorrectionProvider for EdgeFunctionProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::ClaudeEdge
    }

    fn is_configured(&self) -> bool {
        self.settings.is_configured()
    }

    async fn correct(&self, input: &str) -> Result<CorrectionResult, LlmError> {
        let anon_key = self.settings.ensure_configured()?;

        let response = self
            .client
            .post(self.url())
            .bearer_auth(anon_key)
            .json(&EdgeRequest { input })
            .send()
            .await?;

        let body: EdgeResponse = parse(read_json(response).await?)?;
        let corrected = body
            .corrected
            .as_deref()
            .ok_or_else(|| LlmError::InvalidResponse("missing corrected text".to_string()))?;

        // Proxy-supplied analysis is used only when complete
        match (body.confidence(), body.labels()) {
            (Some(confidence), Some(labels)) => {
                let corrected = corrected.trim().to_string();
                if corrected.is_empty() {
                    return Err(LlmError::InvalidResponse(
                        "empty corrected text".to_string(),
                    ));
                }
                let input = input.to_string();
                blocking(move || {
                    let total = levenshtein_distance(&input, &corrected);
                    CorrectionResult::new(corrected, confidence, total, labels)
                })
                .await
            }
            _ => finish(ProviderKind::ClaudeEdge, input, corrected).await,
        }
    }
}
