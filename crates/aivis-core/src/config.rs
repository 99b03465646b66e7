use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a configured value fails to parse.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if a configured value fails to parse.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
///
/// All provider API keys are optional; the CLI registers only the adapters whose
/// keys are present. The database URL is optional too — without one, cost entries
/// stay in the in-memory ledger.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let optional = |var: &str| -> Option<String> { lookup(var).ok().filter(|v| !v.is_empty()) };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = parse_environment(&or_default("AIVIS_ENV", "development"))?;
    let log_level = or_default("AIVIS_LOG_LEVEL", "info");
    let database_url = optional("DATABASE_URL");
    let pricing_path = PathBuf::from(or_default(
        "AIVIS_PRICING_PATH",
        "./config/model_prices.yaml",
    ));

    let openai_api_key = optional("OPENAI_API_KEY");
    let anthropic_api_key = optional("ANTHROPIC_API_KEY");
    let gemini_api_key = optional("GEMINI_API_KEY");
    let perplexity_api_key = optional("PERPLEXITY_API_KEY");
    let search_api_key = optional("BRAVE_SEARCH_API_KEY");

    let openai_model = or_default("AIVIS_OPENAI_MODEL", "gpt-4o-mini");
    let anthropic_model = or_default("AIVIS_ANTHROPIC_MODEL", "claude-3-5-haiku-latest");
    let gemini_model = or_default("AIVIS_GEMINI_MODEL", "gemini-2.0-flash");
    let perplexity_model = or_default("AIVIS_PERPLEXITY_MODEL", "sonar");

    let provider_timeout_secs = parse_u64("AIVIS_PROVIDER_TIMEOUT_SECS", "45")?;
    let empty_retry_delay_ms = parse_u64("AIVIS_EMPTY_RETRY_DELAY_MS", "1500")?;
    let probe_question_delay_ms = parse_u64("AIVIS_PROBE_DELAY_MS", "400")?;

    let search_max_results = parse_usize("AIVIS_SEARCH_MAX_RESULTS", "5")?;
    let search_max_retries = parse_u32("AIVIS_SEARCH_MAX_RETRIES", "3")?;
    let search_backoff_base_ms = parse_u64("AIVIS_SEARCH_BACKOFF_BASE_MS", "1000")?;

    Ok(AppConfig {
        env,
        log_level,
        database_url,
        pricing_path,
        openai_api_key,
        anthropic_api_key,
        gemini_api_key,
        perplexity_api_key,
        search_api_key,
        openai_model,
        anthropic_model,
        gemini_model,
        perplexity_model,
        provider_timeout_secs,
        empty_retry_delay_ms,
        probe_question_delay_ms,
        search_max_results,
        search_max_retries,
        search_backoff_base_ms,
    })
}

fn parse_environment(raw: &str) -> Result<Environment, ConfigError> {
    match raw.to_lowercase().as_str() {
        "development" | "dev" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" | "prod" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "AIVIS_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}
