//! Configuration management for RectifAI
//!
//! Supports loading configuration from:
//! - YAML/TOML files under `config/`
//! - Environment variables (`RECTIFAI__` prefix, `__` separator)
//! - Conventional provider credential variables, read once at startup
//!
//! Provider credentials end up in an explicit [`ProvidersConfig`] that is
//! handed to the orchestrator; nothing downstream reads the environment.

pub mod constants;
pub mod providers;
pub mod settings;

pub use providers::{ApiProviderConfig, EdgeFunctionConfig, ProvidersConfig, ResolvedProvider};
pub use settings::{
    load_settings, load_settings_from, FallbackConfig, ObservabilityConfig, PersistenceConfig,
    RuntimeEnvironment, ServerConfig, Settings,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

impl From<ConfigError> for rectifai_core::Error {
    fn from(err: ConfigError) -> Self {
        rectifai_core::Error::Configuration(err.to_string())
    }
}
