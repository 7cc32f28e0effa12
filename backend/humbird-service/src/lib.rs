/// HumBird Service Library
///
/// JSON-over-HTTP API for the HumBird users and posts collections, backed by
/// MongoDB. Each request maps to a single document store call.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers and route registration
/// - `models`: Mutation results, react toggling, BSON/JSON conversion
/// - `db`: Document store seam, its implementations and repositories
/// - `error`: Error types and HTTP mapping
/// - `middleware`: CORS layer
/// - `config`: Configuration management
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;

pub use config::Config;
pub use error::{AppError, Result};
