//! Application State
//!
//! Shared state across all handlers.

use std::sync::Arc;

use rectifai_config::Settings;
use rectifai_llm::CorrectionOrchestrator;
use rectifai_persistence::{InMemorySubmissionStore, SubmissionStore};

use crate::service::CorrectionService;
use crate::ServerError;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub service: Arc<CorrectionService>,
}

impl AppState {
    /// Chain built from `config.providers`, in-memory submission store
    pub fn new(config: Settings) -> Result<Self, ServerError> {
        let store = InMemorySubmissionStore::with_capacity(config.persistence.memory_capacity);
        Self::with_store(config, Arc::new(store))
    }

    /// Chain built from `config.providers`, caller-provided store (e.g. ScyllaDB)
    pub fn with_store(config: Settings, store: Arc<dyn SubmissionStore>) -> Result<Self, ServerError> {
        let orchestrator = CorrectionOrchestrator::from_config(&config.providers, &config.fallback)?
            .with_max_input_chars(config.server.max_input_chars);
        Ok(Self::with_orchestrator(config, orchestrator, store))
    }

    pub fn with_orchestrator(
        config: Settings,
        orchestrator: CorrectionOrchestrator,
        store: Arc<dyn SubmissionStore>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            service: Arc::new(CorrectionService::new(orchestrator, store)),
        }
    }

    pub fn get_config(&self) -> &Settings {
        &self.config
    }
}
