//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Which translator adapter backs the `/translate` endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TranslatorKind {
    /// Google's public endpoint with MyMemory as fallback.
    Web,
    OpenAi,
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    /// `None` keeps the vocabulary in process memory.
    pub database_url: Option<String>,
    pub log_level: Level,
    pub cors_origin: String,
    pub translator: TranslatorKind,
    pub openai_api_key: Option<String>,
    pub translation_model: String,
    pub source_language: String,
    pub target_language: String,
    pub translate_timeout: Duration,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // --- Load Server and Storage Settings ---
        let bind_address_str = lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let cors_origin =
            lookup("CORS_ORIGIN").unwrap_or_else(|| "http://localhost:3000".to_string());

        // --- Load Translator Settings ---
        let translator = match lookup("TRANSLATOR")
            .unwrap_or_else(|| "web".to_string())
            .to_lowercase()
            .as_str()
        {
            "web" => TranslatorKind::Web,
            "openai" => TranslatorKind::OpenAi,
            other => {
                return Err(ConfigError::InvalidValue(
                    "TRANSLATOR".to_string(),
                    format!("'{}' is not one of web, openai", other),
                ))
            }
        };

        let openai_api_key = lookup("OPENAI_API_KEY");
        if translator == TranslatorKind::OpenAi && openai_api_key.is_none() {
            return Err(ConfigError::MissingVar("OPENAI_API_KEY".to_string()));
        }

        let translation_model =
            lookup("TRANSLATION_MODEL").unwrap_or_else(|| "gpt-4o-mini".to_string());
        let source_language = lookup("SOURCE_LANGUAGE").unwrap_or_else(|| "el".to_string());
        let target_language = lookup("TARGET_LANGUAGE").unwrap_or_else(|| "en".to_string());

        let timeout_str = lookup("TRANSLATE_TIMEOUT_SECS").unwrap_or_else(|| "10".to_string());
        let translate_timeout = timeout_str
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| {
                ConfigError::InvalidValue("TRANSLATE_TIMEOUT_SECS".to_string(), e.to_string())
            })?;

        Ok(Self {
            bind_address,
            database_url,
            log_level,
            cors_origin,
            translator,
            openai_api_key,
            translation_model,
            source_language,
            target_language,
            translate_timeout,
        })
    }
}
