use sqlx::postgres::PgConnectOptions;
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::services::credentials::{BCRYPT_COST, DEFAULT_TOKEN_TTL_MINUTES};

/// Costs bcrypt accepts
const BCRYPT_COST_RANGE: RangeInclusive<u32> = 4..=31;
/// One minute up to one year
const TOKEN_TTL_MINUTES_RANGE: RangeInclusive<i64> = 1..=525_600;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    /// Overrides the database named in `url`
    pub name: Option<String>,
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn connect_options(&self) -> Result<PgConnectOptions, ConfigError> {
        let options = PgConnectOptions::from_str(&self.url).map_err(|_| ConfigError::Invalid {
            key: "DATABASE_URL",
            value: "<redacted>".to_string(),
        })?;

        Ok(match &self.name {
            Some(name) => options.database(name),
            None => options,
        })
    }
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_minutes: i64,
    pub bcrypt_cost: u32,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub host: String,
    pub port: u16,
    pub log_format: LogFormat,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup; blank values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let setting = |key: &'static str| (key, get(key));

        let database = DatabaseConfig {
            url: get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
            name: get("DATABASE_NAME"),
            max_connections: parse_or(setting("DATABASE_MAX_CONNECTIONS"), 5)?,
        };

        let auth = AuthConfig {
            jwt_secret: get("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?,
            token_ttl_minutes: parse_in_range(
                setting("TOKEN_TTL_MINUTES"),
                DEFAULT_TOKEN_TTL_MINUTES,
                TOKEN_TTL_MINUTES_RANGE,
            )?,
            bcrypt_cost: parse_in_range(setting("BCRYPT_COST"), BCRYPT_COST, BCRYPT_COST_RANGE)?,
        };

        let log_format = match get("LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            database,
            auth,
            host: get("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_or(setting("PORT"), 8080)?,
            log_format,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T: FromStr>(
    (key, raw): (&'static str, Option<String>),
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

fn parse_in_range<T>(
    setting: (&'static str, Option<String>),
    default: T,
    range: RangeInclusive<T>,
) -> Result<T, ConfigError>
where
    T: FromStr + PartialOrd + ToString,
{
    let key = setting.0;
    let value = parse_or(setting, default)?;
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
        })
    }
}
