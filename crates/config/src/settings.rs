//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::{persistence, server};
use crate::{ConfigError, ProvidersConfig};

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    #[default]
    Development,
    Staging,
    Production,
}

impl RuntimeEnvironment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Correction providers, credentials and attempt order
    #[serde(default)]
    pub providers: ProvidersConfig,

    /// Rule-based fallback corrector options
    #[serde(default)]
    pub fallback: FallbackConfig,

    /// Submission store (ScyllaDB)
    #[serde(default)]
    pub persistence: PersistenceConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.providers.validate()?;
        self.validate_persistence()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        let server = &self.server;

        if server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                message: "Port cannot be 0".to_string(),
            });
        }

        if server.max_input_chars == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.max_input_chars".to_string(),
                message: "Must be at least 1".to_string(),
            });
        }

        if self.environment.is_production() && server.cors_enabled && server.cors_origins.is_empty()
        {
            tracing::warn!(
                "CORS is enabled in production but no origins are configured. \
                 All cross-origin requests will be rejected."
            );
        }

        Ok(())
    }

    fn validate_persistence(&self) -> Result<(), ConfigError> {
        let persistence = &self.persistence;

        if persistence.replication_factor == 0 {
            return Err(ConfigError::InvalidValue {
                field: "persistence.replication_factor".to_string(),
                message: "Must be at least 1".to_string(),
            });
        }

        if persistence.memory_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "persistence.memory_capacity".to_string(),
                message: "Must be at least 1".to_string(),
            });
        }

        if persistence.enabled && persistence.scylla_hosts.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "persistence.scylla_hosts".to_string(),
                message: "At least one host is required when persistence is enabled".to_string(),
            });
        }

        if persistence.keyspace.is_empty()
            || !persistence
                .keyspace
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(ConfigError::InvalidValue {
                field: "persistence.keyspace".to_string(),
                message: format!(
                    "Must be a non-empty identifier of letters, digits and '_', got '{}'",
                    persistence.keyspace
                ),
            });
        }

        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// CORS allowed origins
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Longest accepted input, in characters
    #[serde(default = "default_max_input_chars")]
    pub max_input_chars: usize,
}

fn default_host() -> String {
    server::DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    server::DEFAULT_PORT
}
fn default_true() -> bool {
    true
}
fn default_max_input_chars() -> usize {
    server::DEFAULT_MAX_INPUT_CHARS
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_enabled: default_true(),
            // Empty by default; must be configured explicitly for production
            cors_origins: Vec::new(),
            max_input_chars: default_max_input_chars(),
        }
    }
}

/// Rule-based fallback corrector options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackConfig {
    /// Apply casual to formal word substitutions
    #[serde(default = "default_true")]
    pub professional_tone: bool,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            professional_tone: true,
        }
    }
}

/// Persistence configuration for ScyllaDB
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Enable ScyllaDB persistence (false = in-memory only)
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_scylla_hosts")]
    pub scylla_hosts: Vec<String>,

    #[serde(default = "default_scylla_keyspace")]
    pub keyspace: String,

    #[serde(default = "default_replication_factor")]
    pub replication_factor: u8,

    /// Submissions kept by the in-memory store, oldest evicted first
    #[serde(default = "default_memory_capacity")]
    pub memory_capacity: usize,
}

fn default_scylla_hosts() -> Vec<String> {
    std::env::var("SCYLLA_HOSTS")
        .map(|s| s.split(',').map(|h| h.trim().to_string()).collect())
        .unwrap_or_else(|_| vec!["127.0.0.1:9042".to_string()])
}

fn default_scylla_keyspace() -> String {
    std::env::var("SCYLLA_KEYSPACE").unwrap_or_else(|_| "rectifai".to_string())
}

fn default_replication_factor() -> u8 {
    1
}

fn default_memory_capacity() -> usize {
    persistence::DEFAULT_MEMORY_CAPACITY
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            scylla_hosts: default_scylla_hosts(),
            keyspace: default_scylla_keyspace(),
            replication_factor: default_replication_factor(),
            memory_capacity: default_memory_capacity(),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub log_json: bool,

    /// Expose Prometheus metrics on `/metrics`
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
            metrics_enabled: true,
        }
    }
}

/// Load settings from files and environment
///
/// Priority (highest to lowest):
/// 1. Environment variables (`RECTIFAI__` prefix)
/// 2. config/{env}.yaml (if env specified)
/// 3. config/default.yaml
///
/// Provider credentials still missing afterwards are filled from the
/// conventional variables (`OPENAI_API_KEY`, ...).
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    load_settings_from("config", env)
}

/// Same as [`load_settings`] with an explicit configuration directory
pub fn load_settings_from(
    dir: impl AsRef<Path>,
    env: Option<&str>,
) -> Result<Settings, ConfigError> {
    load_layers(dir.as_ref(), env, environment_source())
}

/// `RECTIFAI__SECTION__KEY` variables; list keys take comma-separated values
/// (`RECTIFAI__PROVIDERS__ORDER=claude,gemini`)
fn environment_source() -> Environment {
    Environment::with_prefix("RECTIFAI")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("providers.order")
        .with_list_parse_key("server.cors_origins")
        .with_list_parse_key("persistence.scylla_hosts")
}

fn load_layers(
    dir: &Path,
    env: Option<&str>,
    environment: Environment,
) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    let default_path = dir.join("default");
    builder = builder.add_source(File::with_name(&default_path.to_string_lossy()).required(false));

    if let Some(env_name) = env {
        let env_path = dir.join(env_name);
        builder = builder.add_source(File::with_name(&env_path.to_string_lossy()).required(false));
    }

    builder = builder.add_source(environment);

    let config = builder.build()?;
    let mut settings: Settings = config.try_deserialize()?;
    settings.providers = settings.providers.with_env_credentials();

    settings.validate()?;

    Ok(settings)
}
