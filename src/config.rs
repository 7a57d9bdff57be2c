// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is read from the environment exactly once at startup into an
//! [`AppConfig`], which is then handed to the services that need it. Nothing
//! reads the environment after `main` has built the config.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `JWT_PRIVATE_KEY` | RSA private key used to sign tokens (PEM or bare body) | Required |
//! | `JWT_PUBLIC_KEY` | RSA public key used to verify tokens (PEM or bare body) | Required |
//! | `JWT_TTL_SECONDS` | Lifetime of issued tokens; unset means tokens carry no `exp` | Unset |
//! | `BCRYPT_COST` | bcrypt work factor (4..=31) | `12` |
//! | `DATA_DIR` | Directory holding the embedded database | `./data` |
//! | `FOOD_CATALOG_PATH` | JSON file of foods seeded into the catalog at startup | Unset |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `TLS_CERT_PATH` / `TLS_KEY_PATH` | PEM files; when both are set the server speaks HTTPS | Unset |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const JWT_PRIVATE_KEY_ENV: &str = "JWT_PRIVATE_KEY";
pub const JWT_PUBLIC_KEY_ENV: &str = "JWT_PUBLIC_KEY";
pub const JWT_TTL_SECONDS_ENV: &str = "JWT_TTL_SECONDS";
pub const BCRYPT_COST_ENV: &str = "BCRYPT_COST";

/// Environment variable name for the database directory.
///
/// The directory is created on startup if missing; the database file inside
/// it is [`DATABASE_FILE`].
pub const DATA_DIR_ENV: &str = "DATA_DIR";
pub const FOOD_CATALOG_PATH_ENV: &str = "FOOD_CATALOG_PATH";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// File name of the embedded database inside `DATA_DIR`.
pub const DATABASE_FILE: &str = "diet.redb";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

/// Certificate and key for the HTTPS listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// Everything the service needs at startup.
#[derive(Clone)]
pub struct AppConfig {
    pub jwt_private_key: String,
    pub jwt_public_key: String,
    pub jwt_ttl: Option<Duration>,
    pub bcrypt_cost: u32,
    pub data_dir: PathBuf,
    pub food_catalog_path: Option<PathBuf>,
    pub host: String,
    pub port: u16,
    pub tls: Option<TlsPaths>,
    pub log_format: LogFormat,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Key material stays out of logs.
        f.debug_struct("AppConfig")
            .field("jwt_ttl", &self.jwt_ttl)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("data_dir", &self.data_dir)
            .field("food_catalog_path", &self.food_catalog_path)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("tls", &self.tls)
            .field("log_format", &self.log_format)
            .finish_non_exhaustive()
    }
}

impl AppConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let jwt_private_key =
            get(JWT_PRIVATE_KEY_ENV).ok_or(ConfigError::Missing(JWT_PRIVATE_KEY_ENV))?;
        let jwt_public_key =
            get(JWT_PUBLIC_KEY_ENV).ok_or(ConfigError::Missing(JWT_PUBLIC_KEY_ENV))?;

        let jwt_ttl = get(JWT_TTL_SECONDS_ENV)
            .map(|raw| parse_number::<u64>(JWT_TTL_SECONDS_ENV, &raw))
            .transpose()?
            .map(|secs| {
                if secs == 0 {
                    Err(ConfigError::Invalid {
                        name: JWT_TTL_SECONDS_ENV,
                        reason: "must be greater than zero".to_string(),
                    })
                } else {
                    Ok(Duration::from_secs(secs))
                }
            })
            .transpose()?;

        let bcrypt_cost = match get(BCRYPT_COST_ENV) {
            Some(raw) => {
                let cost = parse_number::<u32>(BCRYPT_COST_ENV, &raw)?;
                if !(4..=31).contains(&cost) {
                    return Err(ConfigError::Invalid {
                        name: BCRYPT_COST_ENV,
                        reason: format!("{cost} is outside 4..=31"),
                    });
                }
                cost
            }
            None => bcrypt::DEFAULT_COST,
        };

        let port = match get(PORT_ENV) {
            Some(raw) => parse_number::<u16>(PORT_ENV, &raw)?,
            None => DEFAULT_PORT,
        };

        let tls = match (get(TLS_CERT_PATH_ENV), get(TLS_KEY_PATH_ENV)) {
            (Some(cert), Some(key)) => Some(TlsPaths {
                cert: cert.into(),
                key: key.into(),
            }),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::Missing(TLS_KEY_PATH_ENV)),
            (None, Some(_)) => return Err(ConfigError::Missing(TLS_CERT_PATH_ENV)),
        };

        let log_format = match get(LOG_FORMAT_ENV).as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: LOG_FORMAT_ENV,
                    reason: format!("expected `json` or `pretty`, got `{other}`"),
                })
            }
        };

        Ok(Self {
            jwt_private_key,
            jwt_public_key,
            jwt_ttl,
            bcrypt_cost,
            data_dir: get(DATA_DIR_ENV)
                .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string())
                .into(),
            food_catalog_path: get(FOOD_CATALOG_PATH_ENV).map(PathBuf::from),
            host: get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            tls,
            log_format,
        })
    }

    /// Path of the embedded database file.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                name: HOST_ENV,
                reason: e.to_string(),
            })
    }
}

fn parse_number<T>(name: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        name,
        reason: e.to_string(),
    })
}
