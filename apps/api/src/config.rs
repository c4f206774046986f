use anyhow::{Context, Result};

const DEFAULT_TAGGER_MODEL: &str = "dslim/bert-base-NER";

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    /// Token-classification endpoint queried by the entity tagger.
    pub tagger_url: String,
    pub tagger_api_key: Option<String>,
    pub tagger_model: String,
    /// Training data source. Absent means the models start in fallback mode.
    pub database_url: Option<String>,
    pub training_min_confidence: f64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            tagger_url: require_env("TAGGER_URL")?,
            tagger_api_key: optional_env("TAGGER_API_KEY"),
            tagger_model: optional_env("TAGGER_MODEL")
                .unwrap_or_else(|| DEFAULT_TAGGER_MODEL.to_string()),
            database_url: optional_env("DATABASE_URL"),
            training_min_confidence: std::env::var("TRAINING_MIN_CONFIDENCE")
                .unwrap_or_else(|_| "0.5".to_string())
                .parse::<f64>()
                .context("TRAINING_MIN_CONFIDENCE must be a number")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
