/// Configuration management for HumBird Service
///
/// Settings come from environment variables (optionally seeded from a `.env`
/// file by the binary). MongoDB connection settings are read separately by
/// `mongo_pool::MongoConfig` when the store is built.
use anyhow::{bail, Context, Result};
use mongo_pool::env_utils::{env_string_or, parse_env_optional};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub cors: CorsConfig,
    pub store: StoreConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
    /// HTTP worker count; actix picks one per core when unset
    pub workers: Option<usize>,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins, `*` for any
    pub allowed_origins: String,
}

impl CorsConfig {
    pub fn origins(&self) -> Vec<&str> {
        self.allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .collect()
    }

    pub fn allows_any_origin(&self) -> bool {
        self.origins().contains(&"*")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Mongo,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(StoreBackend::Mongo),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(format!("unknown store backend '{}'", other)),
        }
    }
}

/// Document store selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("PORT must be a valid port number, got '{}'", raw))?,
            Err(_) => 3000,
        };

        let workers = parse_env_optional::<usize>("HTTP_WORKERS").filter(|w| *w > 0);

        let backend = env_string_or("STORE_BACKEND", "mongo")
            .parse::<StoreBackend>()
            .map_err(anyhow::Error::msg)
            .context("Invalid STORE_BACKEND")?;

        let config = Config {
            app: AppConfig {
                env: env_string_or("APP_ENV", "development"),
                host: env_string_or("APP_HOST", "0.0.0.0"),
                port,
                workers,
            },
            cors: CorsConfig {
                allowed_origins: env_string_or("CORS_ALLOWED_ORIGINS", "*"),
            },
            store: StoreConfig { backend },
        };

        if config.cors.origins().is_empty() {
            bail!("CORS_ALLOWED_ORIGINS must list at least one origin");
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in [
            "PORT",
            "HTTP_WORKERS",
            "STORE_BACKEND",
            "APP_ENV",
            "APP_HOST",
            "CORS_ALLOWED_ORIGINS",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_default_values() {
        clear_env();

        let config = Config::from_env().unwrap();

        assert_eq!(config.app.env, "development");
        assert_eq!(config.app.host, "0.0.0.0");
        assert_eq!(config.app.port, 3000);
        assert_eq!(config.app.workers, None);
        assert_eq!(config.store.backend, StoreBackend::Mongo);
        assert!(config.cors.allows_any_origin());
    }

    #[test]
    #[serial]
    fn test_overrides() {
        clear_env();
        std::env::set_var("PORT", "8080");
        std::env::set_var("HTTP_WORKERS", "2");
        std::env::set_var("STORE_BACKEND", "memory");
        std::env::set_var("CORS_ALLOWED_ORIGINS", "https://humbird.app, http://localhost:5173");

        let config = Config::from_env().unwrap();

        assert_eq!(config.app.port, 8080);
        assert_eq!(config.app.workers, Some(2));
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(
            config.cors.origins(),
            vec!["https://humbird.app", "http://localhost:5173"]
        );
        assert!(!config.cors.allows_any_origin());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_values_are_rejected() {
        clear_env();
        std::env::set_var("PORT", "seventy");
        assert!(Config::from_env().is_err());

        clear_env();
        std::env::set_var("STORE_BACKEND", "postgres");
        assert!(Config::from_env().is_err());

        clear_env();
    }
}
