//! MongoDB client management
//!
//! Builds a single long-lived [`mongodb::Client`] from environment
//! configuration. The driver pools connections internally, so services
//! create one client at startup and share it across all requests.

pub mod env_utils;

use env_utils::{env_nonempty, env_string_or, parse_env_or};
use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info};

/// Errors raised while creating or verifying a MongoDB client
#[derive(Debug, Error)]
pub enum PoolError {
    #[error("DB_URI environment variable not set")]
    MissingUri,

    #[error("{0}")]
    Driver(#[from] mongodb::error::Error),

    #[error("MongoDB did not answer ping within {0}s")]
    Timeout(u64),
}

/// MongoDB client configuration
#[derive(Clone)]
pub struct MongoConfig {
    /// Service name reported to the server as the driver app name
    pub app_name: String,
    /// Connection string
    pub uri: String,
    /// Logical database holding the service collections
    pub database_name: String,
    pub max_pool_size: u32,
    pub min_pool_size: u32,
    pub connect_timeout_secs: u64,
    pub server_selection_timeout_secs: u64,
}

impl fmt::Debug for MongoConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MongoConfig")
            .field("app_name", &self.app_name)
            .field("uri", &"[REDACTED]")
            .field("database_name", &self.database_name)
            .field("max_pool_size", &self.max_pool_size)
            .field("min_pool_size", &self.min_pool_size)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field(
                "server_selection_timeout_secs",
                &self.server_selection_timeout_secs,
            )
            .finish()
    }
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            app_name: String::from("unknown"),
            uri: String::new(),
            database_name: String::from("HumBird"),
            max_pool_size: 10,
            min_pool_size: 0,
            connect_timeout_secs: 5,
            server_selection_timeout_secs: 10,
        }
    }
}

impl MongoConfig {
    /// Load configuration from `DB_*` environment variables.
    ///
    /// Only `DB_URI` is required; everything else has a default.
    pub fn from_env(app_name: &str) -> Result<Self, PoolError> {
        let uri = env_nonempty("DB_URI").ok_or(PoolError::MissingUri)?;
        let defaults = Self::default();

        Ok(Self {
            app_name: env_string_or("DB_APP_NAME", app_name),
            uri,
            database_name: env_string_or("DB_NAME", &defaults.database_name),
            max_pool_size: parse_env_or("DB_MAX_POOL_SIZE", defaults.max_pool_size),
            min_pool_size: parse_env_or("DB_MIN_POOL_SIZE", defaults.min_pool_size),
            connect_timeout_secs: parse_env_or(
                "DB_CONNECT_TIMEOUT_SECS",
                defaults.connect_timeout_secs,
            ),
            server_selection_timeout_secs: parse_env_or(
                "DB_SERVER_SELECTION_TIMEOUT_SECS",
                defaults.server_selection_timeout_secs,
            ),
        })
    }

    pub fn log_config(&self) {
        info!(
            "MongoDB Client Configuration: database={}, max_pool_size={}, min_pool_size={}, \
             connect_timeout={}s, server_selection_timeout={}s",
            self.database_name,
            self.max_pool_size,
            self.min_pool_size,
            self.connect_timeout_secs,
            self.server_selection_timeout_secs
        );
    }
}

/// Create a MongoDB client.
///
/// The driver connects lazily: an unreachable server surfaces on the first
/// operation, not here. Only a malformed connection string fails this call.
pub async fn create_client(config: &MongoConfig) -> Result<Client, PoolError> {
    debug!(
        app_name = %config.app_name,
        database = %config.database_name,
        "Creating MongoDB client"
    );

    let mut options = ClientOptions::parse(&config.uri).await?;
    options.app_name = Some(config.app_name.clone());
    options.max_pool_size = Some(config.max_pool_size);
    options.min_pool_size = Some(config.min_pool_size);
    options.connect_timeout = Some(Duration::from_secs(config.connect_timeout_secs));
    options.server_selection_timeout =
        Some(Duration::from_secs(config.server_selection_timeout_secs));

    Ok(Client::with_options(options)?)
}

/// Ping the configured database, bounded by the connect timeout.
pub async fn verify_connection(database: &Database, config: &MongoConfig) -> Result<(), PoolError> {
    let ping = database.run_command(doc! { "ping": 1 }, None);

    match tokio::time::timeout(Duration::from_secs(config.connect_timeout_secs), ping).await {
        Ok(Ok(_)) => {
            info!(
                app_name = %config.app_name,
                database = %config.database_name,
                "MongoDB connection verified"
            );
            Ok(())
        }
        Ok(Err(e)) => {
            error!(app_name = %config.app_name, error = %e, "MongoDB ping failed");
            Err(PoolError::Driver(e))
        }
        Err(_) => {
            error!(
                app_name = %config.app_name,
                timeout_secs = config.connect_timeout_secs,
                "MongoDB ping timed out"
            );
            Err(PoolError::Timeout(config.connect_timeout_secs))
        }
    }
}
