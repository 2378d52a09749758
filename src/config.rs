//! Application configuration management
//!
//! Connection parameters are loaded from environment variables (and `.env`)
//! and can be overridden on the command line.

use std::env;

use crate::constants::{
    DEFAULT_DB_HOST, DEFAULT_DB_NAME, DEFAULT_DB_PORT, DEFAULT_DB_USER, DEFAULT_LOG_FILTER,
};

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

/// Database configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Full connection URL; takes precedence over the individual parts
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub rust_log: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database: DatabaseConfig::from_env()?,
            logging: LoggingConfig::from_env(),
        })
    }
}

impl DatabaseConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
            host: env::var("DB_HOST").unwrap_or_else(|_| DEFAULT_DB_HOST.to_string()),
            port: env::var("DB_PORT")
                .unwrap_or_else(|_| DEFAULT_DB_PORT.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DB_PORT".to_string()))?,
            user: env::var("DB_USER").unwrap_or_else(|_| DEFAULT_DB_USER.to_string()),
            password: env::var("DB_PASSWORD").unwrap_or_default(),
            name: env::var("DB_NAME").unwrap_or_else(|_| DEFAULT_DB_NAME.to_string()),
        })
    }

    /// Connection target without credentials, safe for logging
    pub fn redacted_target(&self) -> String {
        match &self.url {
            Some(url) => match url.rsplit_once('@') {
                Some((_, target)) => target.to_string(),
                None => url.clone(),
            },
            None => format!("{}:{}/{}", self.host, self.port, self.name),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: DEFAULT_DB_HOST.to_string(),
            port: DEFAULT_DB_PORT,
            user: DEFAULT_DB_USER.to_string(),
            password: String::new(),
            name: DEFAULT_DB_NAME.to_string(),
        }
    }
}

impl LoggingConfig {
    fn from_env() -> Self {
        Self {
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string()),
        }
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}
