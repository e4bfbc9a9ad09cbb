//! Provider factory
//!
//! Builds adapters from the providers configuration, one per declared entry
//! in priority order. Unconfigured providers are still built; the
//! orchestrator skips them without a network call.
//!
//! ## Example
//! ```ignore
//! let config = ProvidersConfig::unconfigured().with_api_key(ProviderKind::Gemini, "key");
//! let chain = ProviderFactory::create_chain(&config)?;
//! ```

use std::sync::Arc;

use rectifai_config::ProvidersConfig;
use rectifai_core::ProviderKind;

use crate::{
    claude::ClaudeProvider, edge::EdgeFunctionProvider, gemini::GeminiProvider,
    huggingface::HuggingFaceProvider, openai::OpenAiCompatibleProvider,
    provider::{CorrectionProvider, ProviderSettings},
    LlmError,
};

pub struct ProviderFactory;

impl ProviderFactory {
    /// Build the adapter for one provider
    pub fn create(
        kind: ProviderKind,
        config: &ProvidersConfig,
    ) -> Result<Arc<dyn CorrectionProvider>, LlmError> {
        Self::from_settings(ProviderSettings::from_config(kind, config))
    }

    /// Build an adapter from explicit settings
    pub fn from_settings(
        settings: ProviderSettings,
    ) -> Result<Arc<dyn CorrectionProvider>, LlmError> {
        let provider: Arc<dyn CorrectionProvider> = match settings.kind {
            ProviderKind::ClaudeEdge => Arc::new(EdgeFunctionProvider::new(settings)?),
            ProviderKind::Claude => Arc::new(ClaudeProvider::new(settings)?),
            ProviderKind::Gemini => Arc::new(GeminiProvider::new(settings)?),
            ProviderKind::OpenAi | ProviderKind::Perplexity => {
                Arc::new(OpenAiCompatibleProvider::new(settings)?)
            }
            ProviderKind::HuggingFace => Arc::new(HuggingFaceProvider::new(settings)?),
        };
        Ok(provider)
    }

    /// Build every provider in the declared order
    pub fn create_chain(
        config: &ProvidersConfig,
    ) -> Result<Vec<Arc<dyn CorrectionProvider>>, LlmError> {
        config
            .order
            .iter()
            .map(|&kind| Self::create(kind, config))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_follows_declared_order() {
        let config = ProvidersConfig::unconfigured()
            .with_order(vec![ProviderKind::HuggingFace, ProviderKind::Claude])
            .with_api_key(ProviderKind::Claude, "sk-ant");
        let chain = ProviderFactory::create_chain(&config).unwrap();

        let kinds: Vec<_> = chain.iter().map(|p| p.kind()).collect();
        assert_eq!(kinds, vec![ProviderKind::HuggingFace, ProviderKind::Claude]);
        assert!(!chain[0].is_configured());
        assert!(chain[1].is_configured());
    }

    #[test]
    fn test_default_chain_has_every_provider() {
        let chain = ProviderFactory::create_chain(&ProvidersConfig::unconfigured()).unwrap();
        assert_eq!(chain.len(), ProviderKind::ALL.len());
        assert!(chain.iter().all(|p| !p.is_configured()));
        assert_eq!(chain[3].name(), ProviderKind::OpenAi.display_name());
    }
}
