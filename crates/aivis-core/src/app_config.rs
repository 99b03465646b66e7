use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Optional: scans run without a database, keeping cost entries in memory.
    pub database_url: Option<String>,
    pub pricing_path: PathBuf,

    pub openai_api_key: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub perplexity_api_key: Option<String>,
    pub search_api_key: Option<String>,

    pub openai_model: String,
    pub anthropic_model: String,
    pub gemini_model: String,
    pub perplexity_model: String,

    pub provider_timeout_secs: u64,
    pub empty_retry_delay_ms: u64,
    pub probe_question_delay_ms: u64,

    pub search_max_results: usize,
    pub search_max_retries: u32,
    pub search_backoff_base_ms: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "[redacted]");
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("database_url", &redact(&self.database_url))
            .field("pricing_path", &self.pricing_path)
            .field("openai_api_key", &redact(&self.openai_api_key))
            .field("anthropic_api_key", &redact(&self.anthropic_api_key))
            .field("gemini_api_key", &redact(&self.gemini_api_key))
            .field("perplexity_api_key", &redact(&self.perplexity_api_key))
            .field("search_api_key", &redact(&self.search_api_key))
            .field("openai_model", &self.openai_model)
            .field("anthropic_model", &self.anthropic_model)
            .field("gemini_model", &self.gemini_model)
            .field("perplexity_model", &self.perplexity_model)
            .field("provider_timeout_secs", &self.provider_timeout_secs)
            .field("empty_retry_delay_ms", &self.empty_retry_delay_ms)
            .field("probe_question_delay_ms", &self.probe_question_delay_ms)
            .field("search_max_results", &self.search_max_results)
            .field("search_max_retries", &self.search_max_retries)
            .field("search_backoff_base_ms", &self.search_backoff_base_ms)
            .finish()
    }
}
