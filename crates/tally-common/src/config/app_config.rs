//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file when present).

use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use chrono::FixedOffset;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database: DatabaseConfig,
    pub telegram: TelegramConfig,
    pub grading: GradingConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default)]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Telegram Bot API configuration
#[derive(Clone, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl TelegramConfig {
    /// Upper bound for a single gateway call
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

/// Grading behaviour
#[derive(Debug, Clone, Deserialize)]
pub struct GradingConfig {
    /// Length of freshly allocated member codes
    #[serde(default = "default_code_length")]
    pub code_length: usize,
    /// Offset of the local calendar used for "today" and leaderboard timestamps
    #[serde(default = "default_utc_offset_minutes")]
    pub utc_offset_minutes: i32,
    /// Leaderboard title for rosters whose chat has no title
    #[serde(default = "default_roster_title")]
    pub default_roster_title: String,
}

impl GradingConfig {
    /// Local timezone as a fixed offset
    ///
    /// # Errors
    /// Returns an error if the offset is outside ±24h
    pub fn timezone(&self) -> Result<FixedOffset, ConfigError> {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).ok_or_else(|| {
            ConfigError::InvalidValue("UTC_OFFSET_MINUTES", self.utc_offset_minutes.to_string())
        })
    }
}

impl Default for GradingConfig {
    fn default() -> Self {
        Self {
            code_length: default_code_length(),
            utc_offset_minutes: default_utc_offset_minutes(),
            default_roster_title: default_roster_title(),
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "tally".to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_api_base() -> String {
    "https://api.telegram.org".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_code_length() -> usize {
    tally_core::value_objects::DEFAULT_CODE_LENGTH
}

fn default_utc_offset_minutes() -> i32 {
    300 // UTC+5
}

fn default_roster_title() -> String {
    "Group".to_string()
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required variables are missing or a value does not parse
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source
    ///
    /// # Errors
    /// Returns an error if required variables are missing or a value does not parse
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::MissingVar(key))
        };

        let config = Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env: match lookup("APP_ENV") {
                    Some(raw) => Environment::parse(&raw)
                        .ok_or(ConfigError::InvalidValue("APP_ENV", raw))?,
                    None => Environment::default(),
                },
            },
            database: DatabaseConfig {
                url: required("DATABASE_URL")?,
                max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", default_max_connections)?,
                min_connections: parse_or(&lookup, "DATABASE_MIN_CONNECTIONS", default_min_connections)?,
            },
            telegram: TelegramConfig {
                bot_token: required("BOT_TOKEN")?,
                api_base: lookup("TELEGRAM_API_BASE")
                    .map(|s| s.trim_end_matches('/').to_string())
                    .unwrap_or_else(default_api_base),
                request_timeout_secs: parse_or(&lookup, "TELEGRAM_TIMEOUT_SECS", default_request_timeout_secs)?,
            },
            grading: GradingConfig {
                code_length: parse_or(&lookup, "CODE_LENGTH", default_code_length)?,
                utc_offset_minutes: parse_or(&lookup, "UTC_OFFSET_MINUTES", default_utc_offset_minutes)?,
                default_roster_title: lookup("DEFAULT_ROSTER_TITLE")
                    .unwrap_or_else(default_roster_title),
            },
        };

        if config.grading.code_length == 0 {
            return Err(ConfigError::InvalidValue("CODE_LENGTH", "0".to_string()));
        }
        config.grading.timezone()?;

        Ok(config)
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: fn() -> T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key, raw)),
        None => Ok(default()),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
