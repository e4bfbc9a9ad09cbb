//! Correction orchestrator
//!
//! Walks the provider chain strictly one at a time. Unconfigured providers
//! are skipped without a call, failures are logged and absorbed, and the
//! first success ends the walk. When nothing succeeds the rule-based
//! corrector produces the result; it performs no I/O and cannot fail for
//! non-empty input.

use std::sync::Arc;

use rectifai_config::{FallbackConfig, ProvidersConfig};
use rectifai_core::{
    CorrectionRequest, CorrectionResult, CorrectionSource, ProviderKind, Result,
};
use rectifai_text_processing::RuleBasedCorrector;

use crate::factory::ProviderFactory;
use crate::provider::CorrectionProvider;
use crate::LlmError;

/// A provider attempt that did not produce a result
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderFailure {
    pub provider: ProviderKind,
    pub error: LlmError,
}

/// Result of one walk down the chain, with what happened on the way
#[derive(Debug, Clone)]
pub struct CorrectionOutcome {
    pub result: CorrectionResult,
    pub source: CorrectionSource,
    /// Providers that were called and failed, in attempt order
    pub failures: Vec<ProviderFailure>,
    /// Providers skipped for lack of configuration
    pub skipped: Vec<ProviderKind>,
}

impl CorrectionOutcome {
    pub fn used_fallback(&self) -> bool {
        self.source == CorrectionSource::RuleBased
    }
}

pub struct CorrectionOrchestrator {
    providers: Vec<Arc<dyn CorrectionProvider>>,
    fallback: RuleBasedCorrector,
    max_input_chars: Option<usize>,
}

impl CorrectionOrchestrator {
    /// Chain in the given order, ending at `fallback`
    pub fn new(providers: Vec<Arc<dyn CorrectionProvider>>, fallback: RuleBasedCorrector) -> Self {
        Self {
            providers,
            fallback,
            max_input_chars: None,
        }
    }

    /// Reject input longer than `max` characters before any provider runs
    pub fn with_max_input_chars(mut self, max: usize) -> Self {
        self.max_input_chars = Some(max);
        self
    }

    /// Build the chain from configuration
    pub fn from_config(
        providers: &ProvidersConfig,
        fallback: &FallbackConfig,
    ) -> std::result::Result<Self, LlmError> {
        let chain = ProviderFactory::create_chain(providers)?;
        Ok(Self::new(
            chain,
            RuleBasedCorrector::new(fallback.professional_tone),
        ))
    }

    /// Only the rule-based corrector; no network access
    pub fn fallback_only(fallback: RuleBasedCorrector) -> Self {
        Self::new(Vec::new(), fallback)
    }

    pub fn providers(&self) -> &[Arc<dyn CorrectionProvider>] {
        &self.providers
    }

    /// Configured providers in attempt order
    pub fn configured_providers(&self) -> Vec<ProviderKind> {
        self.providers
            .iter()
            .filter(|p| p.is_configured())
            .map(|p| p.kind())
            .collect()
    }

    pub fn max_input_chars(&self) -> Option<usize> {
        self.max_input_chars
    }

    /// Validate raw input against emptiness and the length limit
    pub fn request(&self, input: &str) -> Result<CorrectionRequest> {
        match self.max_input_chars {
            Some(max) => CorrectionRequest::with_max_chars(input, max),
            None => CorrectionRequest::new(input),
        }
    }

    /// Correct `input`; fails only on empty, whitespace-only or oversized input
    pub async fn correct_text(&self, input: &str) -> Result<CorrectionResult> {
        Ok(self.correct_text_detailed(input).await?.result)
    }

    /// Like [`correct_text`](Self::correct_text), also reporting which stage
    /// answered and which providers failed
    pub async fn correct_text_detailed(&self, input: &str) -> Result<CorrectionOutcome> {
        let request = self.request(input)?;
        Ok(self.run(&request).await)
    }

    /// Walk the chain for an already validated request
    pub async fn run(&self, request: &CorrectionRequest) -> CorrectionOutcome {
        let input = request.text();
        let mut failures = Vec::new();
        let mut skipped = Vec::new();

        for (attempt, provider) in self.providers.iter().enumerate() {
            let kind = provider.kind();

            if !provider.is_configured() {
                tracing::debug!(provider = %kind, "Skipping unconfigured provider");
                skipped.push(kind);
                continue;
            }

            tracing::info!(provider = %kind, attempt, "Attempting correction");

            match provider.correct(input).await {
                Ok(result) => {
                    tracing::info!(
                        provider = %kind,
                        confidence = result.confidence,
                        changes = result.changes.total,
                        "Correction succeeded"
                    );
                    return CorrectionOutcome {
                        result,
                        source: CorrectionSource::Provider(kind),
                        failures,
                        skipped,
                    };
                }
                Err(e) if e.is_unconfigured() => {
                    tracing::debug!(provider = %kind, "Provider reported missing configuration");
                    skipped.push(kind);
                }
                Err(e) => {
                    tracing::warn!(
                        provider = %kind,
                        rate_limited = e.is_rate_limited(),
                        error = %e,
                        "Provider failed, trying next"
                    );
                    failures.push(ProviderFailure {
                        provider: kind,
                        error: e,
                    });
                }
            }
        }

        tracing::info!(
            failed = failures.len(),
            skipped = skipped.len(),
            "Using rule-based corrector"
        );

        CorrectionOutcome {
            result: self.run_fallback(request).await,
            source: CorrectionSource::RuleBased,
            failures,
            skipped,
        }
    }
}

impl CorrectionOrchestrator {
    /// Rule table plus edit distance, on the blocking pool
    async fn run_fallback(&self, request: &CorrectionRequest) -> CorrectionResult {
        let fallback = self.fallback;
        let owned = request.clone();
        match tokio::task::spawn_blocking(move || fallback.correct_request(&owned)).await {
            Ok(result) => result,
            // A panicking fallback is a defect, not a provider failure
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(_) => self.fallback.correct_request(request),
        }
    }
}
