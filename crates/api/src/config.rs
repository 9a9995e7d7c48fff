use std::str::FromStr;
use std::time::Duration;

use tdm_core::config::{
    GenerationConfig, DEFAULT_MAX_GENERATION_SIZE, DEFAULT_MODEL, DEFAULT_RETENTION_DAYS,
    DEFAULT_SYNTHESIS_TIMEOUT_SECS, DEFAULT_TEMPERATURE,
};

/// Upper bound accepted for `TDM_RETENTION_DAYS`.
pub const MAX_RETENTION_DAYS: i64 = 3_650;

/// Default chat-completions base URL.
pub const DEFAULT_LLM_API_URL: &str = "https://api.openai.com/v1";

/// Chat-completions provider settings.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_url: String,
    pub api_key: Option<String>,
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development except
/// `DATABASE_URL`, which `main` reads on its own.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds. Must exceed the synthesis timeout.
    pub request_timeout_secs: u64,
    /// Period of the expired-batch sweep.
    pub cleanup_interval_secs: u64,
    /// Register the built-in `User`/`Order` schemas at startup.
    pub seed_default_schemas: bool,
    pub generation: GenerationConfig,
    pub llm: LlmConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                     |
    /// |------------------------------|-----------------------------|
    /// | `HOST`                       | `0.0.0.0`                   |
    /// | `PORT`                       | `3000`                      |
    /// | `CORS_ORIGINS`               | `http://localhost:5173`     |
    /// | `REQUEST_TIMEOUT_SECS`       | `120`                       |
    /// | `TDM_MAX_GENERATION_SIZE`    | `1000`                      |
    /// | `TDM_RETENTION_DAYS`         | `30`                        |
    /// | `TDM_DEFAULT_MODEL`          | `gpt-4`                     |
    /// | `TDM_DEFAULT_TEMPERATURE`    | `0.7`                       |
    /// | `TDM_SYNTHESIS_TIMEOUT_SECS` | `90`                        |
    /// | `TDM_CLEANUP_INTERVAL_SECS`  | `3600`                      |
    /// | `TDM_SEED_DEFAULT_SCHEMAS`   | `true`                      |
    /// | `LLM_API_URL`                | `https://api.openai.com/v1` |
    /// | `LLM_API_KEY`                | unset                       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port: u16 = env_or("PORT", 3000);

        let cors_origins = parse_origins(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into()),
        );

        let generation = GenerationConfig {
            max_generation_size: env_or("TDM_MAX_GENERATION_SIZE", DEFAULT_MAX_GENERATION_SIZE),
            retention: retention_window(env_or("TDM_RETENTION_DAYS", DEFAULT_RETENTION_DAYS))
                .unwrap_or_else(|e| panic!("{e}")),
            default_model: std::env::var("TDM_DEFAULT_MODEL")
                .unwrap_or_else(|_| DEFAULT_MODEL.into()),
            default_temperature: env_or("TDM_DEFAULT_TEMPERATURE", DEFAULT_TEMPERATURE),
            synthesis_timeout: Duration::from_secs(env_or(
                "TDM_SYNTHESIS_TIMEOUT_SECS",
                DEFAULT_SYNTHESIS_TIMEOUT_SECS,
            )),
            ..GenerationConfig::default()
        };

        let llm = LlmConfig {
            api_url: std::env::var("LLM_API_URL").unwrap_or_else(|_| DEFAULT_LLM_API_URL.into()),
            api_key: std::env::var("LLM_API_KEY").ok().filter(|k| !k.is_empty()),
        };

        let config = Self {
            host,
            port,
            cors_origins,
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 120),
            cleanup_interval_secs: env_or("TDM_CLEANUP_INTERVAL_SECS", 3600),
            seed_default_schemas: env_or("TDM_SEED_DEFAULT_SCHEMAS", true),
            generation,
            llm,
        };
        config
            .validate()
            .unwrap_or_else(|e| panic!("Invalid configuration: {e}"));
        config
    }

    /// Check cross-field constraints that parsing alone cannot catch.
    pub fn validate(&self) -> Result<(), String> {
        if self.cleanup_interval_secs == 0 {
            return Err("TDM_CLEANUP_INTERVAL_SECS must be greater than 0".to_string());
        }
        if self.generation.max_generation_size < 1 {
            return Err("TDM_MAX_GENERATION_SIZE must be at least 1".to_string());
        }
        retention_window(self.generation.retention.num_days())?;

        let synthesis_secs = self.generation.synthesis_timeout.as_secs();
        if synthesis_secs == 0 {
            return Err("TDM_SYNTHESIS_TIMEOUT_SECS must be greater than 0".to_string());
        }
        if self.request_timeout_secs <= synthesis_secs {
            return Err(format!(
                "REQUEST_TIMEOUT_SECS ({}) must exceed TDM_SYNTHESIS_TIMEOUT_SECS ({synthesis_secs})",
                self.request_timeout_secs
            ));
        }
        Ok(())
    }
}

/// Retention window for `days`, bounded to `1..=MAX_RETENTION_DAYS`.
fn retention_window(days: i64) -> Result<chrono::Duration, String> {
    if !(1..=MAX_RETENTION_DAYS).contains(&days) {
        return Err(format!(
            "TDM_RETENTION_DAYS must be between 1 and {MAX_RETENTION_DAYS} (got {days})"
        ));
    }
    Ok(chrono::Duration::days(days))
}

/// Parse `key` from the environment, or fall back to `default` when unset.
///
/// Panics on a present but unparseable value so misconfiguration fails fast.
fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{key} has invalid value '{raw}': {e}")),
        Err(_) => default,
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
