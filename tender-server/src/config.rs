//! Environment-backed configuration.
//!
//! The whole surface is environment variables (plus a best-effort `.env`
//! load); there is no config file.

use std::env;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    /// Prebuilt dashboard asset tree served on unmatched routes.
    pub static_root: PathBuf,
    pub env_file_loaded: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let env_file_loaded = dotenvy::dotenv().is_ok();

        Ok(Self {
            server: ServerConfig {
                host: var_or("HOST", "0.0.0.0"),
                port: port_var("PORT", 8080)?,
            },
            database: DatabaseConfig {
                host: var_or("DB_HOST", "localhost"),
                port: port_var("DB_PORT", 5432)?,
                name: var_or("DB_NAME", "tender_tracking"),
                user: var_or("DB_USER", "postgres"),
                password: var_or("DB_PASSWORD", ""),
            },
            static_root: PathBuf::from(var_or("STATIC_ROOT", "dist")),
            env_file_loaded,
        })
    }
}

fn var_or(key: &'static str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn port_var(key: &'static str, default: u16) -> Result<u16, ConfigError> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => {
            value.parse().map_err(|_| ConfigError::Invalid {
                key,
                message: format!("expected a port number, got {value:?}"),
            })
        }
        _ => Ok(default),
    }
}
