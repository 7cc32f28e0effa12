/// Document store access layer
///
/// [`DocumentStore`] is the single seam between handlers and the database.
/// Repositories build filters and updates on top of it; implementations
/// decide where documents live.
use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{doc, Bson, Document};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::{StoreBackend, StoreConfig};
use crate::models::{DeleteResult, InsertResult, UpdateResult};

pub mod memory;
pub mod mongo;
pub mod post_repo;
pub mod unavailable;
pub mod user_repo;

pub use memory::MemoryStore;
pub use mongo::MongoStore;
pub use post_repo::PostRepository;
pub use unavailable::UnavailableStore;
pub use user_repo::UserRepository;

/// Name reported to MongoDB and used in log lines
pub const SERVICE_NAME: &str = "humbird-service";

/// Store handle shared by every request
pub type SharedStore = Arc<dyn DocumentStore>;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("{0}")]
    Unavailable(String),

    /// Mirrors MongoDB's E11000 on the `_id` index
    #[error("E11000 duplicate key error collection: {collection} dup key: {{ _id: {id} }}")]
    DuplicateKey { collection: &'static str, id: Bson },
}

/// Collections owned by this service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Posts,
}

impl Collection {
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Posts => "posts",
        }
    }
}

/// Single-document match condition
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    All,
    ById(ObjectId),
    /// `Bson::Null` also matches documents lacking the field
    FieldEq { field: String, value: Bson },
}

impl Filter {
    pub fn field_eq(field: impl Into<String>, value: impl Into<Bson>) -> Self {
        Filter::FieldEq {
            field: field.into(),
            value: value.into(),
        }
    }

    /// MongoDB query document for this filter
    pub fn to_document(&self) -> Document {
        match self {
            Filter::All => Document::new(),
            Filter::ById(id) => doc! { "_id": *id },
            Filter::FieldEq { field, value } => {
                let mut query = Document::new();
                query.insert(field.clone(), value.clone());
                query
            }
        }
    }

    pub fn matches(&self, document: &Document) -> bool {
        match self {
            Filter::All => true,
            Filter::ById(id) => document.get("_id") == Some(&Bson::ObjectId(*id)),
            Filter::FieldEq { field, value } => match document.get(field) {
                Some(found) => found == value,
                None => *value == Bson::Null,
            },
        }
    }
}

/// Operations the service needs from a document database
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find_one(&self, collection: Collection, filter: Filter) -> StoreResult<Option<Document>>;

    async fn find_many(&self, collection: Collection, filter: Filter) -> StoreResult<Vec<Document>>;

    /// Insert a document, assigning an `_id` when it has none
    async fn insert_one(&self, collection: Collection, document: Document) -> StoreResult<InsertResult>;

    /// Apply `$set` to the first match; with `upsert`, insert when nothing matches
    async fn update_one(
        &self,
        collection: Collection,
        filter: Filter,
        set: Document,
        upsert: bool,
    ) -> StoreResult<UpdateResult>;

    async fn delete_one(&self, collection: Collection, filter: Filter) -> StoreResult<DeleteResult>;

    async fn ping(&self) -> StoreResult<()>;
}

/// Build the store handle for the configured backend.
///
/// Never fails: when MongoDB cannot be set up the error is logged and an
/// [`UnavailableStore`] is returned, so data routes fail per request while
/// the process keeps serving.
pub async fn init_store(config: &StoreConfig) -> SharedStore {
    match config.backend {
        StoreBackend::Memory => {
            warn!("Using in-memory document store; data is lost on restart");
            Arc::new(MemoryStore::new())
        }
        StoreBackend::Mongo => match connect_mongo().await {
            Ok(store) => Arc::new(store),
            Err(e) => {
                error!(error = %e, "Document store initialization failed; data routes will return errors");
                Arc::new(UnavailableStore::new(e.to_string()))
            }
        },
    }
}

async fn connect_mongo() -> Result<MongoStore, mongo_pool::PoolError> {
    let config = mongo_pool::MongoConfig::from_env(SERVICE_NAME)?;
    config.log_config();

    let client = mongo_pool::create_client(&config).await?;
    let database = client.database(&config.database_name);

    // The driver reconnects on demand, so an unreachable server is not fatal here.
    match mongo_pool::verify_connection(&database, &config).await {
        Ok(()) => info!("Connected to MongoDB database {}", config.database_name),
        Err(e) => warn!(error = %e, "MongoDB not reachable yet; continuing"),
    }

    Ok(MongoStore::new(database))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_field_filter_matches_missing_field() {
        let filter = Filter::field_eq("email", Bson::Null);
        assert!(filter.matches(&doc! { "name": "anon" }));
        assert!(filter.matches(&doc! { "email": Bson::Null }));
        assert!(!filter.matches(&doc! { "email": "a@x.io" }));
    }

    #[test]
    fn filter_query_documents() {
        let id = ObjectId::new();
        assert_eq!(Filter::All.to_document(), doc! {});
        assert_eq!(Filter::ById(id).to_document(), doc! { "_id": id });
        assert_eq!(
            Filter::field_eq("email", "a@x.io").to_document(),
            doc! { "email": "a@x.io" }
        );
    }
}
