// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is read from the environment once at startup and passed
//! down explicitly; nothing reads the environment after [`AppConfig::from_env`].
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `JWT_SECRET` | HMAC secret used to sign and verify tokens | Required |
//! | `DATABASE_PATH` | Location of the ledger database file | `data/finance.redb` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `4000` |
//! | `TOKEN_TTL_DAYS` | Token lifetime in days | `7` |
//! | `CORS_ALLOWED_ORIGINS` | Comma-separated allowed origins | any origin |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::fmt;
use std::path::PathBuf;

use chrono::Duration;

/// Environment variable holding the token signing secret.
///
/// The server refuses to start without it.
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";

/// Environment variable for the database file path.
pub const DATABASE_PATH_ENV: &str = "DATABASE_PATH";

/// Default database location, relative to the working directory.
pub const DEFAULT_DATABASE_PATH: &str = "data/finance.redb";

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 4000;

/// Environment variable overriding the token lifetime.
pub const TOKEN_TTL_DAYS_ENV: &str = "TOKEN_TTL_DAYS";

/// Tokens expire this many days after issuance unless overridden.
pub const DEFAULT_TOKEN_TTL_DAYS: i64 = 7;

/// Upper bound accepted for `TOKEN_TTL_DAYS`.
pub const MAX_TOKEN_TTL_DAYS: i64 = 365;

/// Comma-separated list of origins allowed by CORS.
pub const CORS_ALLOWED_ORIGINS_ENV: &str = "CORS_ALLOWED_ORIGINS";

pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Default tracing filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Startup configuration failure. Always fatal.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(ConfigError::Invalid {
                name: LOG_FORMAT_ENV,
                value: value.to_string(),
            }),
        }
    }
}

/// Process-wide settings, loaded once.
#[derive(Clone)]
pub struct AppConfig {
    pub jwt_secret: String,
    pub database_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub token_ttl: Duration,
    /// Empty means any origin.
    pub cors_allowed_origins: Vec<String>,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        // Blank values count as unset.
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let jwt_secret = var(JWT_SECRET_ENV).ok_or(ConfigError::Missing(JWT_SECRET_ENV))?;

        let port = match var(PORT_ENV) {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                name: PORT_ENV,
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };

        let token_ttl = match var(TOKEN_TTL_DAYS_ENV) {
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(days @ 1..=MAX_TOKEN_TTL_DAYS) => Duration::days(days),
                _ => {
                    return Err(ConfigError::Invalid {
                        name: TOKEN_TTL_DAYS_ENV,
                        value: raw,
                    })
                }
            },
            None => Duration::days(DEFAULT_TOKEN_TTL_DAYS),
        };

        let log_format = match var(LOG_FORMAT_ENV) {
            Some(raw) => LogFormat::parse(raw.trim())?,
            None => LogFormat::default(),
        };

        let cors_allowed_origins = var(CORS_ALLOWED_ORIGINS_ENV)
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            jwt_secret,
            database_path: var(DATABASE_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH)),
            host: var(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            token_ttl,
            cors_allowed_origins,
            log_format,
        })
    }

    /// `host:port` string suitable for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("jwt_secret", &"<redacted>")
            .field("database_path", &self.database_path)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("token_ttl", &self.token_ttl)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("log_format", &self.log_format)
            .finish()
    }
}
