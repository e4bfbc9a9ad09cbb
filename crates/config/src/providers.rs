//! Provider configuration
//!
//! One explicit object enumerating every provider, its credential (or the
//! absence of one) and the declared priority order. Built once at startup and
//! injected into the orchestrator.

use serde::{Deserialize, Serialize};

use rectifai_core::ProviderKind;

use crate::constants::{endpoints, env_vars, models};
use crate::ConfigError;

/// Settings for a provider reached with a single API key
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiProviderConfig {
    /// API key; absent or empty means the provider is skipped
    #[serde(default)]
    pub api_key: Option<String>,
    /// Override of the default endpoint
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Override of the default model
    #[serde(default)]
    pub model: Option<String>,
}

impl ApiProviderConfig {
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Default::default()
        }
    }
}

/// Settings for the hosted edge function proxy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeFunctionConfig {
    /// Project base URL, e.g. `https://xyz.supabase.co`
    #[serde(default)]
    pub url: Option<String>,
    /// Anonymous (public) key sent as bearer token
    #[serde(default)]
    pub anon_key: Option<String>,
}

/// Fully resolved provider settings, defaults applied
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedProvider {
    pub kind: ProviderKind,
    pub api_key: String,
    pub endpoint: String,
    pub model: String,
}

/// All provider settings plus the declared attempt order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvidersConfig {
    /// Priority order; providers not listed are never attempted
    #[serde(default = "default_order")]
    pub order: Vec<ProviderKind>,

    /// Per-request timeout. `None` keeps the HTTP client's default.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    #[serde(default)]
    pub claude_edge: EdgeFunctionConfig,
    #[serde(default)]
    pub claude: ApiProviderConfig,
    #[serde(default)]
    pub gemini: ApiProviderConfig,
    #[serde(default)]
    pub openai: ApiProviderConfig,
    #[serde(default)]
    pub perplexity: ApiProviderConfig,
    #[serde(default)]
    pub huggingface: ApiProviderConfig,
}

fn default_order() -> Vec<ProviderKind> {
    ProviderKind::ALL.to_vec()
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            order: default_order(),
            request_timeout_secs: None,
            claude_edge: EdgeFunctionConfig::default(),
            claude: ApiProviderConfig::default(),
            gemini: ApiProviderConfig::default(),
            openai: ApiProviderConfig::default(),
            perplexity: ApiProviderConfig::default(),
            huggingface: ApiProviderConfig::default(),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

impl ProvidersConfig {
    /// No credentials at all; every correction goes to the rule-based corrector
    pub fn unconfigured() -> Self {
        Self::default()
    }

    /// Fill absent credentials from the process environment.
    ///
    /// Call once at startup. Values already present (from files or
    /// `RECTIFAI__` variables) win.
    pub fn with_env_credentials(self) -> Self {
        self.with_credentials_from(|name| std::env::var(name).ok())
    }

    /// Fill absent credentials through an arbitrary lookup
    pub fn with_credentials_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let first = |names: &[&str]| -> Option<String> {
            names
                .iter()
                .filter_map(|name| lookup(name))
                .find(|v| !v.trim().is_empty())
        };

        if non_empty(&self.claude_edge.url).is_none() {
            self.claude_edge.url = first(env_vars::EDGE_URL);
        }
        if non_empty(&self.claude_edge.anon_key).is_none() {
            self.claude_edge.anon_key = first(env_vars::EDGE_ANON_KEY);
        }

        let api_keys: [(&mut ApiProviderConfig, &[&str]); 5] = [
            (&mut self.claude, env_vars::CLAUDE),
            (&mut self.gemini, env_vars::GEMINI),
            (&mut self.openai, env_vars::OPENAI),
            (&mut self.perplexity, env_vars::PERPLEXITY),
            (&mut self.huggingface, env_vars::HUGGINGFACE),
        ];
        for (provider, names) in api_keys {
            if non_empty(&provider.api_key).is_none() {
                provider.api_key = first(names);
            }
        }

        self
    }

    /// Set the credential for one provider (builder style)
    pub fn with_api_key(mut self, kind: ProviderKind, api_key: impl Into<String>) -> Self {
        let api_key = Some(api_key.into());
        match kind {
            ProviderKind::ClaudeEdge => self.claude_edge.anon_key = api_key,
            ProviderKind::Claude => self.claude.api_key = api_key,
            ProviderKind::Gemini => self.gemini.api_key = api_key,
            ProviderKind::OpenAi => self.openai.api_key = api_key,
            ProviderKind::Perplexity => self.perplexity.api_key = api_key,
            ProviderKind::HuggingFace => self.huggingface.api_key = api_key,
        }
        self
    }

    /// Override the endpoint for one provider (the edge function's project URL)
    pub fn with_endpoint(mut self, kind: ProviderKind, endpoint: impl Into<String>) -> Self {
        let endpoint = Some(endpoint.into());
        match kind {
            ProviderKind::ClaudeEdge => self.claude_edge.url = endpoint,
            ProviderKind::Claude => self.claude.endpoint = endpoint,
            ProviderKind::Gemini => self.gemini.endpoint = endpoint,
            ProviderKind::OpenAi => self.openai.endpoint = endpoint,
            ProviderKind::Perplexity => self.perplexity.endpoint = endpoint,
            ProviderKind::HuggingFace => self.huggingface.endpoint = endpoint,
        }
        self
    }

    pub fn with_order(mut self, order: Vec<ProviderKind>) -> Self {
        self.order = order;
        self
    }

    fn api_config(&self, kind: ProviderKind) -> Option<&ApiProviderConfig> {
        match kind {
            ProviderKind::ClaudeEdge => None,
            ProviderKind::Claude => Some(&self.claude),
            ProviderKind::Gemini => Some(&self.gemini),
            ProviderKind::OpenAi => Some(&self.openai),
            ProviderKind::Perplexity => Some(&self.perplexity),
            ProviderKind::HuggingFace => Some(&self.huggingface),
        }
    }

    /// The credential for a provider, if one is present and non-empty
    pub fn credential(&self, kind: ProviderKind) -> Option<&str> {
        match kind {
            ProviderKind::ClaudeEdge => non_empty(&self.claude_edge.anon_key),
            _ => self.api_config(kind).and_then(|c| non_empty(&c.api_key)),
        }
    }

    /// Whether a provider has everything it needs to be attempted
    pub fn is_configured(&self, kind: ProviderKind) -> bool {
        match kind {
            ProviderKind::ClaudeEdge => {
                non_empty(&self.claude_edge.url).is_some() && self.credential(kind).is_some()
            }
            _ => self.credential(kind).is_some(),
        }
    }

    /// Configured providers in declared order
    pub fn configured(&self) -> Vec<ProviderKind> {
        self.order
            .iter()
            .copied()
            .filter(|kind| self.is_configured(*kind))
            .collect()
    }

    pub fn default_endpoint(kind: ProviderKind) -> &'static str {
        match kind {
            // The edge function has no public default; its URL is per project
            ProviderKind::ClaudeEdge => "",
            ProviderKind::Claude => endpoints::ANTHROPIC,
            ProviderKind::Gemini => endpoints::GEMINI,
            ProviderKind::OpenAi => endpoints::OPENAI,
            ProviderKind::Perplexity => endpoints::PERPLEXITY,
            ProviderKind::HuggingFace => endpoints::HUGGINGFACE,
        }
    }

    pub fn default_model(kind: ProviderKind) -> &'static str {
        match kind {
            ProviderKind::ClaudeEdge | ProviderKind::Claude => models::CLAUDE,
            ProviderKind::Gemini => models::GEMINI,
            ProviderKind::OpenAi => models::OPENAI,
            ProviderKind::Perplexity => models::PERPLEXITY,
            ProviderKind::HuggingFace => models::HUGGINGFACE,
        }
    }

    /// Resolve a provider's settings with defaults applied.
    ///
    /// Returns `None` when the provider is not configured.
    pub fn resolve(&self, kind: ProviderKind) -> Option<ResolvedProvider> {
        if !self.is_configured(kind) {
            return None;
        }
        let api_key = self.credential(kind)?.to_string();

        let (endpoint, model) = match kind {
            ProviderKind::ClaudeEdge => (
                non_empty(&self.claude_edge.url)?.to_string(),
                Self::default_model(kind).to_string(),
            ),
            _ => {
                let cfg = self.api_config(kind)?;
                (
                    non_empty(&cfg.endpoint)
                        .unwrap_or(Self::default_endpoint(kind))
                        .to_string(),
                    non_empty(&cfg.model)
                        .unwrap_or(Self::default_model(kind))
                        .to_string(),
                )
            }
        };

        Some(ResolvedProvider {
            kind,
            api_key,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model,
        })
    }

    /// Validate order and endpoints
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = Vec::with_capacity(self.order.len());
        for kind in &self.order {
            if seen.contains(kind) {
                return Err(ConfigError::InvalidValue {
                    field: "providers.order".to_string(),
                    message: format!("Provider {} listed more than once", kind),
                });
            }
            seen.push(*kind);
        }

        let urls = [
            ("providers.claude_edge.url", &self.claude_edge.url),
            ("providers.claude.endpoint", &self.claude.endpoint),
            ("providers.gemini.endpoint", &self.gemini.endpoint),
            ("providers.openai.endpoint", &self.openai.endpoint),
            ("providers.perplexity.endpoint", &self.perplexity.endpoint),
            ("providers.huggingface.endpoint", &self.huggingface.endpoint),
        ];
        for (field, value) in urls {
            if let Some(endpoint) = non_empty(value) {
                if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                    return Err(ConfigError::InvalidValue {
                        field: field.to_string(),
                        message: format!("Must start with http:// or https://, got {}", endpoint),
                    });
                }
            }
        }

        if self.request_timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "providers.request_timeout_secs".to_string(),
                message: "Must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_default_has_nothing_configured() {
        let config = ProvidersConfig::default();
        assert_eq!(config.order.len(), 6);
        assert!(config.configured().is_empty());
    }

    #[test]
    fn test_empty_key_counts_as_absent() {
        let config = ProvidersConfig::default().with_api_key(ProviderKind::OpenAi, "   ");
        assert!(!config.is_configured(ProviderKind::OpenAi));
    }

    #[test]
    fn test_edge_needs_url_and_key() {
        let config = ProvidersConfig::default().with_api_key(ProviderKind::ClaudeEdge, "anon");
        assert!(!config.is_configured(ProviderKind::ClaudeEdge));

        let config = config.with_endpoint(ProviderKind::ClaudeEdge, "https://x.supabase.co");
        assert!(config.is_configured(ProviderKind::ClaudeEdge));
    }

    #[test]
    fn test_configured_follows_declared_order() {
        let config = ProvidersConfig::default()
            .with_order(vec![
                ProviderKind::Perplexity,
                ProviderKind::Gemini,
                ProviderKind::Claude,
            ])
            .with_api_key(ProviderKind::Claude, "a")
            .with_api_key(ProviderKind::Perplexity, "b")
            .with_api_key(ProviderKind::OpenAi, "not-in-order");

        assert_eq!(
            config.configured(),
            vec![ProviderKind::Perplexity, ProviderKind::Claude]
        );
    }

    #[test]
    fn test_credentials_from_lookup() {
        let config = ProvidersConfig::default().with_credentials_from(lookup(&[
            ("CLAUDE_API_KEY", "sk-ant"),
            ("GEMINI_API_KEY", ""),
            ("VITE_GEMINI_API_KEY", "gem"),
            ("SUPABASE_URL", "https://p.supabase.co"),
            ("SUPABASE_ANON_KEY", "anon"),
        ]));

        assert_eq!(config.credential(ProviderKind::Claude), Some("sk-ant"));
        assert_eq!(config.credential(ProviderKind::Gemini), Some("gem"));
        assert!(config.is_configured(ProviderKind::ClaudeEdge));
        assert!(!config.is_configured(ProviderKind::OpenAi));
    }

    #[test]
    fn test_explicit_credentials_win_over_lookup() {
        let config = ProvidersConfig::default()
            .with_api_key(ProviderKind::OpenAi, "from-file")
            .with_credentials_from(lookup(&[("OPENAI_API_KEY", "from-env")]));
        assert_eq!(config.credential(ProviderKind::OpenAi), Some("from-file"));
    }

    #[test]
    fn test_resolve_applies_defaults() {
        let config = ProvidersConfig::default().with_api_key(ProviderKind::Gemini, "g");
        let resolved = config.resolve(ProviderKind::Gemini).unwrap();
        assert_eq!(resolved.endpoint, endpoints::GEMINI);
        assert_eq!(resolved.model, models::GEMINI);
        assert!(config.resolve(ProviderKind::Claude).is_none());
    }

    #[test]
    fn test_resolve_trims_trailing_slash() {
        let config = ProvidersConfig::default()
            .with_api_key(ProviderKind::OpenAi, "k")
            .with_endpoint(ProviderKind::OpenAi, "http://localhost:9000/v1/");
        assert_eq!(
            config.resolve(ProviderKind::OpenAi).unwrap().endpoint,
            "http://localhost:9000/v1"
        );
    }

    #[test]
    fn test_validate_rejects_duplicates() {
        let config = ProvidersConfig::default()
            .with_order(vec![ProviderKind::Gemini, ProviderKind::Gemini]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_endpoint() {
        let config = ProvidersConfig::default().with_endpoint(ProviderKind::Claude, "ftp://x");
        assert!(config.validate().is_err());
        assert!(ProvidersConfig::default().validate().is_ok());
    }

    #[test]
    fn test_deserialize_partial() {
        let json = r#"{ "order": ["openai", "gemini"], "openai": { "api_key": "sk" } }"#;
        let config: ProvidersConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.order, vec![ProviderKind::OpenAi, ProviderKind::Gemini]);
        assert_eq!(config.configured(), vec![ProviderKind::OpenAi]);
    }
}
