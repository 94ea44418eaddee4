//! Configuration module for environment variables and application settings

use std::env;
use std::fmt;
use std::num::NonZeroUsize;

use anyhow::{Result, anyhow};

use crate::database::DatabaseConfig;

/// Application configuration loaded once at startup and passed down explicitly
#[derive(Debug, Clone)]
pub struct Config {
    /// Token signing configuration
    pub auth: AuthConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Server configuration
    pub server: ServerConfig,

    /// Drop and re-create the initial users and orders on startup
    pub seed_initial_data: bool,
}

/// Secret used to sign and verify access tokens
#[derive(Clone)]
pub struct AuthConfig {
    pub api_secret: String,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("api_secret", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origins allowed by the CORS layer
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_secret = lookup("API_SECRET")
            .ok_or_else(|| anyhow!("API_SECRET environment variable is required"))?;
        if api_secret.trim().is_empty() {
            anyhow::bail!("API_SECRET must not be empty");
        }

        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| anyhow!("DATABASE_URL environment variable is required"))?;
        let mut database = DatabaseConfig::from_url(&database_url)?;
        if let Some(max) = lookup("DATABASE_MAX_CONNECTIONS") {
            database.max_size = max
                .parse::<NonZeroUsize>()
                .map_err(|_| anyhow!("DATABASE_MAX_CONNECTIONS must be a positive integer"))?
                .get();
        }
        database.ssl = lookup("DATABASE_SSL").is_some_and(|v| parse_flag(&v));

        let port = match lookup("SERVER_PORT").or_else(|| lookup("PORT")) {
            Some(port) => port
                .parse()
                .map_err(|_| anyhow!("SERVER_PORT must be a valid port number, got {port:?}"))?,
            None => 8080,
        };

        let allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000".to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            auth: AuthConfig { api_secret },
            database,
            server: ServerConfig {
                host: lookup("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port,
                allowed_origins,
            },
            seed_initial_data: lookup("SEED_INITIAL_DATA").is_some_and(|v| parse_flag(&v)),
        })
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
