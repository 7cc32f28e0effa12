use async_trait::async_trait;
use bson::Document;

use super::{Collection, DocumentStore, Filter, StoreError, StoreResult};
use crate::models::{DeleteResult, InsertResult, UpdateResult};

/// Stand-in used when the real store could not be set up at startup.
/// Every operation fails with the original initialization error.
#[derive(Debug, Clone)]
pub struct UnavailableStore {
    reason: String,
}

impl UnavailableStore {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn fail<T>(&self) -> StoreResult<T> {
        Err(StoreError::Unavailable(self.reason.clone()))
    }
}

#[async_trait]
impl DocumentStore for UnavailableStore {
    async fn find_one(&self, _: Collection, _: Filter) -> StoreResult<Option<Document>> {
        self.fail()
    }

    async fn find_many(&self, _: Collection, _: Filter) -> StoreResult<Vec<Document>> {
        self.fail()
    }

    async fn insert_one(&self, _: Collection, _: Document) -> StoreResult<InsertResult> {
        self.fail()
    }

    async fn update_one(&self, _: Collection, _: Filter, _: Document, _: bool) -> StoreResult<UpdateResult> {
        self.fail()
    }

    async fn delete_one(&self, _: Collection, _: Filter) -> StoreResult<DeleteResult> {
        self.fail()
    }

    async fn ping(&self) -> StoreResult<()> {
        self.fail()
    }
}
