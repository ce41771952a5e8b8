//! Environment-driven application configuration.

use std::str::FromStr;

use secrecy::SecretString;
use validator::Validate;

use crate::domain::{AppError, ConfigError};

pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8899";
pub const DEFAULT_CONFIRMATION_TIMEOUT_SECS: u64 = 60;
pub const MIN_CONFIRMATION_TIMEOUT_SECS: u64 = 1;
pub const MAX_CONFIRMATION_TIMEOUT_SECS: u64 = 600;

/// Output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(ConfigError::InvalidValue {
                key: "LOG_FORMAT".to_string(),
                message: format!("unknown format '{other}'"),
            }),
        }
    }
}

/// Settings shared by every provider in an application context.
#[derive(Debug, Validate)]
pub struct AppConfig {
    #[validate(url)]
    pub blockchain_rpc_url: String,
    #[validate(range(min = 1, max = 600))]
    pub confirmation_timeout_secs: u64,
    pub log_format: LogFormat,
    /// Base58 issuer key handed to the production blockchain provider.
    pub issuer_private_key: Option<SecretString>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            blockchain_rpc_url: DEFAULT_RPC_URL.to_string(),
            confirmation_timeout_secs: DEFAULT_CONFIRMATION_TIMEOUT_SECS,
            log_format: LogFormat::default(),
            issuer_private_key: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from `.env` (if present) and the process environment.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let blockchain_rpc_url =
            lookup("BLOCKCHAIN_RPC_URL").unwrap_or_else(|| DEFAULT_RPC_URL.to_string());

        let confirmation_timeout_secs = match lookup("CONFIRMATION_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "CONFIRMATION_TIMEOUT_SECS".to_string(),
                message: format!("'{raw}' is not a number of seconds"),
            })?,
            None => DEFAULT_CONFIRMATION_TIMEOUT_SECS,
        };

        let log_format = match lookup("LOG_FORMAT") {
            Some(raw) => raw.parse()?,
            None => LogFormat::default(),
        };

        let issuer_private_key = lookup("ISSUER_PRIVATE_KEY")
            .filter(|key| !key.is_empty())
            .map(SecretString::from);

        let config = Self {
            blockchain_rpc_url,
            confirmation_timeout_secs,
            log_format,
            issuer_private_key,
        };
        config.validate()?;
        Ok(config)
    }
}
