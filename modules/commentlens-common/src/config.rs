use std::env;

use crate::error::PipelineError;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Scraping
    pub apify_token: String,

    // AI provider
    pub openai_api_key: String,
    pub openai_model: String,

    // Database
    pub database_url: String,

    // Web server
    pub web_host: String,
    pub web_port: u16,
}

impl Config {
    /// Load configuration from environment variables. All credentials are
    /// checked here, before any network call is made.
    pub fn from_env() -> Result<Self, PipelineError> {
        Ok(Self {
            apify_token: required_env("APIFY_TOKEN")?,
            openai_api_key: required_env("OPENAI_API_KEY")?,
            openai_model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-5-mini".to_string()),
            database_url: required_env("DATABASE_URL")?,
            web_host: env::var("WEB_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            web_port: env::var("WEB_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| PipelineError::Validation("WEB_PORT must be a number".to_string()))?,
        })
    }

    /// Log the loaded configuration with credentials masked.
    pub fn log_redacted(&self) {
        tracing::info!(
            apify_token = %redact(&self.apify_token),
            openai_api_key = %redact(&self.openai_api_key),
            openai_model = %self.openai_model,
            database_url = %redact(&self.database_url),
            web_host = %self.web_host,
            web_port = self.web_port,
            "Configuration loaded"
        );
    }
}

fn required_env(key: &str) -> Result<String, PipelineError> {
    env::var(key).map_err(|_| PipelineError::ConfigMissing(key.to_string()))
}

/// Mask a secret down to its last four characters.
pub fn redact(secret: &str) -> String {
    let count = secret.chars().count();
    if count <= 4 {
        return "****".to_string();
    }
    let tail: String = secret.chars().skip(count - 4).collect();
    format!("****{tail}")
}
