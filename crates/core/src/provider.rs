//! Provider identifiers

use std::fmt;

use serde::{Deserialize, Serialize};

/// External correction providers, in no particular order
///
/// The priority order is configuration, not a property of this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderKind {
    /// Claude reached through the hosted edge function
    #[serde(rename = "claude_edge")]
    ClaudeEdge,
    /// Anthropic Messages API called directly
    #[serde(rename = "claude")]
    Claude,
    #[serde(rename = "gemini")]
    Gemini,
    #[serde(rename = "openai")]
    OpenAi,
    #[serde(rename = "perplexity")]
    Perplexity,
    /// Hugging Face hosted inference API
    #[serde(rename = "huggingface")]
    HuggingFace,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 6] = [
        ProviderKind::ClaudeEdge,
        ProviderKind::Claude,
        ProviderKind::Gemini,
        ProviderKind::OpenAi,
        ProviderKind::Perplexity,
        ProviderKind::HuggingFace,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::ClaudeEdge => "claude_edge",
            ProviderKind::Claude => "claude",
            ProviderKind::Gemini => "gemini",
            ProviderKind::OpenAi => "openai",
            ProviderKind::Perplexity => "perplexity",
            ProviderKind::HuggingFace => "huggingface",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::ClaudeEdge => "Claude (edge function)",
            ProviderKind::Claude => "Claude",
            ProviderKind::Gemini => "Gemini",
            ProviderKind::OpenAi => "OpenAI",
            ProviderKind::Perplexity => "Perplexity",
            ProviderKind::HuggingFace => "Hugging Face",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which stage of the fallback chain produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "provider")]
pub enum CorrectionSource {
    Provider(ProviderKind),
    RuleBased,
}

impl CorrectionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            CorrectionSource::Provider(kind) => kind.as_str(),
            CorrectionSource::RuleBased => "rule_based",
        }
    }
}

impl fmt::Display for CorrectionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_names_match_as_str() {
        for kind in ProviderKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
            let back: ProviderKind = serde_json::from_str(&json).unwrap();
            assert_eq!(back, kind);
        }
    }

    #[test]
    fn test_source_display() {
        assert_eq!(CorrectionSource::RuleBased.to_string(), "rule_based");
        assert_eq!(
            CorrectionSource::Provider(ProviderKind::Gemini).to_string(),
            "gemini"
        );
    }
}
