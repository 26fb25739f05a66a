use std::fmt::Display;
use std::str::FromStr;

use axum::http::HeaderValue;

use crate::auth::jwt::JwtConfig;

/// Rejected configuration value.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has invalid value '{value}': {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Server configuration loaded from environment variables.
///
/// All fields except the database URL and the JWT secret have defaults
/// suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Reported by `/internal/info` (default: `idm`).
    pub app_name: String,
    /// Reported by `/internal/info` (default: crate version).
    pub app_version: String,
    pub database_url: String,
    /// Upper bound for the connection pool (default: `20`).
    pub db_max_connections: u32,
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8080`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Grace period for in-flight requests after a shutdown signal (default: `5`).
    pub shutdown_timeout_secs: u64,
    pub jwt: JwtConfig,
    pub role_cache: RoleCacheConfig,
    pub log: LogConfig,
}

/// Role cache settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleCacheConfig {
    /// `false` serves role reads straight from the database.
    pub enabled: bool,
    /// Redis connection string; the in-process cache is used when unset.
    pub redis_url: Option<String>,
    pub ttl_secs: u64,
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// One of `trace`, `debug`, `info`, `warn`, `error` (lowercased).
    pub level: String,
    /// Human-readable output instead of JSON lines.
    pub develop_mode: bool,
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                    |
    /// |-------------------------|----------------------------|
    /// | `DATABASE_URL`          | **required**               |
    /// | `APP_NAME`              | `idm`                      |
    /// | `APP_VERSION`           | crate version              |
    /// | `DB_MAX_CONNECTIONS`    | `20`                       |
    /// | `HOST`                  | `0.0.0.0`                  |
    /// | `PORT`                  | `8080`                     |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `5`                        |
    /// | `ROLE_CACHE_ENABLED`    | `true`                     |
    /// | `REDIS_URL`             | unset (in-process cache)   |
    /// | `ROLE_CACHE_TTL_SECS`   | `300`                      |
    /// | `LOG_LEVEL`             | `info`                     |
    /// | `LOG_DEVELOP_MODE`      | `false`                    |
    ///
    /// JWT settings are documented on [`JwtConfig::from_lookup`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&|key: &str| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, which returns the raw value of a
    /// variable or `None` when it is unset.
    pub fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = required(lookup, "DATABASE_URL")?;

        let app_name = lookup("APP_NAME").unwrap_or_else(|| "idm".into());
        let app_version =
            lookup("APP_VERSION").unwrap_or_else(|| env!("CARGO_PKG_VERSION").into());

        let db_max_connections = parsed(lookup, "DB_MAX_CONNECTIONS", 20u32)?;
        if db_max_connections == 0 {
            return Err(invalid("DB_MAX_CONNECTIONS", "0", "must be at least 1"));
        }

        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = parsed(lookup, "PORT", 8080u16)?;

        let cors_origins: Vec<String> = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if let Some(bad) = cors_origins
            .iter()
            .find(|o| HeaderValue::from_str(o).is_err())
        {
            return Err(invalid("CORS_ORIGINS", bad, "not a valid origin header value"));
        }

        let request_timeout_secs = parsed(lookup, "REQUEST_TIMEOUT_SECS", 30u64)?;
        let shutdown_timeout_secs = parsed(lookup, "SHUTDOWN_TIMEOUT_SECS", 5u64)?;

        let role_cache = RoleCacheConfig {
            enabled: flag(lookup, "ROLE_CACHE_ENABLED", true)?,
            redis_url: lookup("REDIS_URL").filter(|url| !url.trim().is_empty()),
            ttl_secs: parsed(lookup, "ROLE_CACHE_TTL_SECS", 300u64)?,
        };

        let level = lookup("LOG_LEVEL")
            .unwrap_or_else(|| "info".into())
            .trim()
            .to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(invalid(
                "LOG_LEVEL",
                &level,
                "expected one of trace, debug, info, warn, error",
            ));
        }
        let log = LogConfig {
            level,
            develop_mode: flag(lookup, "LOG_DEVELOP_MODE", false)?,
        };

        let jwt = JwtConfig::from_lookup(lookup)?;

        Ok(Self {
            app_name,
            app_version,
            database_url,
            db_max_connections,
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            jwt,
            role_cache,
            log,
        })
    }
}

pub(crate) fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(key))
}

pub(crate) fn parsed<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| invalid(key, &raw, &e.to_string())),
    }
}

fn flag<F>(lookup: &F, key: &'static str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => match raw.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            _ => Err(invalid(key, &raw, "expected true or false")),
        },
    }
}

fn invalid(key: &'static str, value: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
