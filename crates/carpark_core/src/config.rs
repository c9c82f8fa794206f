//! Process configuration from environment variables.
//!
//! # Responsibility
//! - Resolve store location, platform token, logging and retry settings.
//!
//! # Invariants
//! - Blank values are treated as unset.
//! - Malformed numeric values are rejected, never silently defaulted.
//! - The platform token is never rendered by `Debug`.

use crate::logging::default_log_level;
use crate::service::retry::RetryPolicy;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_DB_PATH: &str = "CARPARK_DB_PATH";
pub const ENV_BOT_TOKEN: &str = "CARPARK_BOT_TOKEN";
pub const ENV_LOG_LEVEL: &str = "CARPARK_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "CARPARK_LOG_DIR";
pub const ENV_RETRY_MAX_ATTEMPTS: &str = "CARPARK_RETRY_MAX_ATTEMPTS";
pub const ENV_RETRY_DELAY_MS: &str = "CARPARK_RETRY_DELAY_MS";

const DEFAULT_DB_FILE_NAME: &str = "database.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidNumber { key: &'static str, value: String },
    ZeroAttempts,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidNumber { key, value } => {
                write!(f, "{key} must be a non-negative integer, got `{value}`")
            }
            Self::ZeroAttempts => write!(f, "{ENV_RETRY_MAX_ATTEMPTS} must be at least 1"),
        }
    }
}

impl Error for ConfigError {}

/// Resolved bot settings.
#[derive(Clone)]
pub struct BotConfig {
    pub db_path: PathBuf,
    pub bot_token: Option<String>,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub retry: RetryPolicy,
}

impl Debug for BotConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotConfig")
            .field("db_path", &self.db_path)
            .field("bot_token", &self.bot_token.as_ref().map(|_| "<redacted>"))
            .field("log_level", &self.log_level)
            .field("log_dir", &self.log_dir)
            .field("retry", &self.retry)
            .finish()
    }
}

impl BotConfig {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through `lookup`, which maps a variable name to
    /// its raw value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let db_path = read(ENV_DB_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE_NAME));
        let log_level = read(ENV_LOG_LEVEL).unwrap_or_else(|| default_log_level().to_string());

        let mut retry = RetryPolicy::default();
        if let Some(raw) = read(ENV_RETRY_MAX_ATTEMPTS) {
            retry.max_attempts = parse_number(ENV_RETRY_MAX_ATTEMPTS, &raw)?;
            if retry.max_attempts == 0 {
                return Err(ConfigError::ZeroAttempts);
            }
        }
        if let Some(raw) = read(ENV_RETRY_DELAY_MS) {
            retry.delay = Duration::from_millis(parse_number(ENV_RETRY_DELAY_MS, &raw)?);
        }

        Ok(Self {
            db_path,
            bot_token: read(ENV_BOT_TOKEN),
            log_level,
            log_dir: read(ENV_LOG_DIR),
            retry,
        })
    }
}

fn parse_number<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.parse::<T>().map_err(|_| ConfigError::InvalidNumber {
        key,
        value: raw.to_string(),
    })
}
