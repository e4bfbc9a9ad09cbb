//! Correction providers and the fallback chain
//!
//! Features:
//! - One adapter per external service (Claude via edge function, Claude,
//!   Gemini, OpenAI, Perplexity, Hugging Face), one outbound POST per call
//! - Shared post-hoc analysis of every provider's output
//! - Ordered fallback chain ending at the rule-based corrector
//!
//! ## Example
//! ```ignore
//! let providers = ProviderFactory::create_chain(&settings.providers)?;
//! let orchestrator = CorrectionOrchestrator::new(providers, RuleBasedCorrector::default());
//! let result = orchestrator.correct_text("i cant go there.").await?;
//! ```

pub mod claude;
pub mod edge;
pub mod factory;
pub mod gemini;
pub mod huggingface;
pub mod openai;
pub mod orchestrator;
pub mod prompt;
pub mod provider;

pub use claude::ClaudeProvider;
pub use edge::EdgeFunctionProvider;
pub use factory::ProviderFactory;
pub use gemini::GeminiProvider;
pub use huggingface::HuggingFaceProvider;
pub use openai::OpenAiCompatibleProvider;
pub use orchestrator::{CorrectionOrchestrator, CorrectionOutcome, ProviderFailure};
pub use provider::{CorrectionProvider, ProviderSettings};

use rectifai_core::ProviderKind;
use thiserror::Error;

/// Provider adapter errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LlmError {
    #[error("{0} is not configured")]
    Unconfigured(ProviderKind),

    #[error("HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Provider reported error: {0}")]
    ProviderReported(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl LlmError {
    /// Non-success HTTP status; rate limiting gets an explicit message
    pub fn api(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        let message = if status == 429 {
            format!("quota or rate limit exceeded, try again later ({})", body)
        } else {
            body
        };
        LlmError::Api { status, message }
    }

    pub fn is_unconfigured(&self) -> bool {
        matches!(self, LlmError::Unconfigured(_))
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, LlmError::Api { status: 429, .. })
    }

    /// Convert into the crate-wide error, naming the provider that failed
    pub fn into_core(self, provider: ProviderKind) -> rectifai_core::Error {
        match self {
            LlmError::Unconfigured(kind) => rectifai_core::Error::ProviderUnconfigured {
                provider: kind.to_string(),
            },
            other => rectifai_core::Error::Provider {
                provider: provider.to_string(),
                message: other.to_string(),
            },
        }
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        LlmError::Network(err.to_string())
    }
}
