//! Environment configuration.
//!
//! Everything the backend needs comes from the environment (a `.env` file is
//! loaded by the binary before this runs): database location, token signing
//! secret, and the completion provider settings. Secrets are wrapped in
//! [`secrecy::SecretString`] at the boundary and stay wrapped.

use secrecy::SecretString;
use thiserror::Error;

use crate::sqlite::pool::default_database_url;

/// Default model when `OPENROUTER_MODEL` is unset.
const DEFAULT_MODEL: &str = "deepseek/deepseek-chat-v3-0324";

/// Default completion endpoint when `OPENROUTER_BASE_URL` is unset.
const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Default `HTTP-Referer` header value. Set this to the frontend origin in
/// production so OpenRouter attributes traffic correctly.
const DEFAULT_REFERER: &str = "http://localhost:3000";

/// Default `X-Title` header value.
const DEFAULT_TITLE: &str = "Chatbot";

/// Errors from reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
}

/// Settings for the completion provider.
pub struct ProviderConfig {
    pub api_key: SecretString,
    pub model: String,
    pub base_url: String,
    pub referer: String,
    pub title: String,
}

/// Full backend configuration.
pub struct AppConfig {
    pub database_url: String,
    pub token_secret: SecretString,
    pub provider: ProviderConfig,
}

impl AppConfig {
    /// Read configuration from the environment.
    ///
    /// `CONFAB_TOKEN_SECRET` and `OPENROUTER_API_KEY` are required; the rest
    /// fall back to defaults. Fails at startup rather than at first use.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url =
            std::env::var("CONFAB_DATABASE_URL").unwrap_or_else(|_| default_database_url());

        let token_secret = require("CONFAB_TOKEN_SECRET")?;
        let api_key = require("OPENROUTER_API_KEY")?;

        let provider = ProviderConfig {
            api_key: SecretString::from(api_key),
            model: env_or("OPENROUTER_MODEL", DEFAULT_MODEL),
            base_url: env_or("OPENROUTER_BASE_URL", DEFAULT_BASE_URL),
            referer: env_or("OPENROUTER_REFERER", DEFAULT_REFERER),
            title: env_or("OPENROUTER_TITLE", DEFAULT_TITLE),
        };

        tracing::debug!(
            model = %provider.model,
            base_url = %provider.base_url,
            "provider configured"
        );

        Ok(Self {
            database_url,
            token_secret: SecretString::from(token_secret),
            provider,
        })
    }
}

fn require(key: &'static str) -> Result<String, ConfigError> {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVar(key)),
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_var_error_names_the_variable() {
        let err = ConfigError::MissingVar("CONFAB_TOKEN_SECRET");
        assert_eq!(
            err.to_string(),
            "missing required environment variable CONFAB_TOKEN_SECRET"
        );
    }
}
