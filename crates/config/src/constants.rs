//! Centralized constants: default endpoints, models and credential variables

/// Default API endpoints
pub mod endpoints {
    pub const ANTHROPIC: &str = "https://api.anthropic.com";
    pub const GEMINI: &str = "https://generativelanguage.googleapis.com";
    pub const OPENAI: &str = "https://api.openai.com/v1";
    pub const PERPLEXITY: &str = "https://api.perplexity.ai";
    pub const HUGGINGFACE: &str = "https://api-inference.huggingface.co";
    /// Path of the correction edge function, relative to the project URL
    pub const EDGE_FUNCTION_PATH: &str = "/functions/v1/claude-correction";
}

/// Default model identifiers
pub mod models {
    pub const CLAUDE: &str = "claude-3-5-sonnet-20241022";
    pub const GEMINI: &str = "gemini-1.5-flash";
    pub const OPENAI: &str = "gpt-3.5-turbo";
    pub const PERPLEXITY: &str = "llama-3.1-sonar-large-128k-online";
    pub const HUGGINGFACE: &str = "grammarly/coedit-large";
}

/// Conventional credential variables, checked in order
pub mod env_vars {
    pub const EDGE_URL: &[&str] = &["SUPABASE_URL", "VITE_SUPABASE_URL"];
    pub const EDGE_ANON_KEY: &[&str] = &["SUPABASE_ANON_KEY", "VITE_SUPABASE_ANON_KEY"];
    pub const CLAUDE: &[&str] = &["ANTHROPIC_API_KEY", "CLAUDE_API_KEY"];
    pub const GEMINI: &[&str] = &["GEMINI_API_KEY", "VITE_GEMINI_API_KEY"];
    pub const OPENAI: &[&str] = &["OPENAI_API_KEY", "VITE_OPENAI_API_KEY"];
    pub const PERPLEXITY: &[&str] = &["PERPLEXITY_API_KEY", "VITE_PERPLEXITY_API_KEY"];
    pub const HUGGINGFACE: &[&str] = &["HUGGINGFACE_API_KEY", "HF_TOKEN", "VITE_HUGGINGFACE_API_KEY"];
}

/// Server defaults
pub mod server {
    pub const DEFAULT_PORT: u16 = 8080;
    pub const DEFAULT_HOST: &str = "0.0.0.0";
    /// Edit distance is quadratic in length; longer input is rejected
    pub const DEFAULT_MAX_INPUT_CHARS: usize = 5_000;
}

/// Persistence defaults
pub mod persistence {
    /// Submissions kept by the in-memory store before the oldest are evicted
    pub const DEFAULT_MEMORY_CAPACITY: usize = 10_000;
}
