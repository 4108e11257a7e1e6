//! Environment-driven process configuration.
//!
//! Both binaries read the same variables. Parsing goes through a lookup
//! function so tests can supply values without touching the process
//! environment.

use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::auth::JwtSettings;
use crate::telegram::TelegramSettings;
use thiserror::Error;

const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
const DEFAULT_ACCESS_TTL_SECS: i64 = 300;
const DEFAULT_REFRESH_TTL_SECS: i64 = 86_400;
const DEFAULT_API_BASE: &str = "https://api.telegram.org";
const DEFAULT_NOTIFY_TIMEOUT_SECS: u64 = 10;
const DEFAULT_POLL_TIMEOUT_SECS: u64 = 30;

/// Configuration loading failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is unset or blank.
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    /// A variable is set but cannot be parsed.
    #[error("invalid value for {variable}: {reason}")]
    Invalid {
        /// Offending variable.
        variable: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Log output style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable multi-line output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("expected `pretty` or `json`, got `{other}`")),
        }
    }
}

/// Settings shared by the API server and the bot.
#[derive(Clone)]
pub struct AppConfig {
    /// `PostgreSQL` connection URL.
    pub database_url: String,
    /// Upper bound of the connection pool.
    pub database_max_connections: u32,
    /// Listen address of the HTTP API.
    pub http_bind_addr: SocketAddr,
    /// Token signing settings.
    pub jwt: JwtSettings,
    /// Bot API connection settings.
    pub telegram: TelegramSettings,
    /// Log output style.
    pub log_format: LogFormat,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("database_url", &"<redacted>")
            .field("database_max_connections", &self.database_max_connections)
            .field("http_bind_addr", &self.http_bind_addr)
            .field("jwt", &self.jwt)
            .field("telegram", &self.telegram)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl AppConfig {
    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required variable is missing or a value
    /// is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to
    /// its value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required variable is missing or a value
    /// is malformed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let vars = Lookup(lookup);

        let access_ttl = vars.parsed("JWT_ACCESS_TTL_SECS", DEFAULT_ACCESS_TTL_SECS)?;
        let refresh_ttl = vars.parsed("JWT_REFRESH_TTL_SECS", DEFAULT_REFRESH_TTL_SECS)?;
        let jwt = JwtSettings {
            secret: vars.required("JWT_SECRET")?,
            access_ttl: positive_seconds("JWT_ACCESS_TTL_SECS", access_ttl)?,
            refresh_ttl: positive_seconds("JWT_REFRESH_TTL_SECS", refresh_ttl)?,
        };

        let telegram = TelegramSettings {
            token: vars.required("TELEGRAM_BOT_TOKEN")?,
            api_base: vars
                .optional("TELEGRAM_API_BASE")
                .unwrap_or_else(|| DEFAULT_API_BASE.to_owned()),
            send_timeout: Duration::from_secs(
                vars.parsed("NOTIFY_TIMEOUT_SECS", DEFAULT_NOTIFY_TIMEOUT_SECS)?,
            ),
            poll_timeout: Duration::from_secs(
                vars.parsed("POLL_TIMEOUT_SECS", DEFAULT_POLL_TIMEOUT_SECS)?,
            ),
        };

        let default_addr = SocketAddr::from_str(DEFAULT_BIND_ADDR).map_err(|err| {
            ConfigError::Invalid {
                variable: "HTTP_BIND_ADDR",
                reason: err.to_string(),
            }
        })?;

        Ok(Self {
            database_url: vars.required("DATABASE_URL")?,
            database_max_connections: vars
                .parsed("DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?,
            http_bind_addr: vars.parsed("HTTP_BIND_ADDR", default_addr)?,
            jwt,
            telegram,
            log_format: vars.parsed("LOG_FORMAT", LogFormat::default())?,
        })
    }
}

struct Lookup<F>(F);

impl<F> Lookup<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn optional(&self, variable: &str) -> Option<String> {
        (self.0)(variable).filter(|value| !value.trim().is_empty())
    }

    fn required(&self, variable: &'static str) -> Result<String, ConfigError> {
        self.optional(variable).ok_or(ConfigError::Missing(variable))
    }

    fn parsed<T>(&self, variable: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        self.optional(variable).map_or(Ok(default), |raw| {
            raw.trim().parse().map_err(|err: T::Err| ConfigError::Invalid {
                variable,
                reason: err.to_string(),
            })
        })
    }
}

fn positive_seconds(variable: &'static str, secs: i64) -> Result<chrono::Duration, ConfigError> {
    if secs <= 0 {
        return Err(ConfigError::Invalid {
            variable,
            reason: "must be a positive number of seconds".to_owned(),
        });
    }
    chrono::Duration::try_seconds(secs).ok_or_else(|| ConfigError::Invalid {
        variable,
        reason: "duration out of range".to_owned(),
    })
}
