use bson::oid::ObjectId;
use bson::{Bson, Document};

use super::{Collection, Filter, SharedStore, StoreResult};
use crate::models::{DeleteResult, InsertResult, UpdateResult, POST_CONTENT_FIELD, REACTS_FIELD};

/// Repository for the `posts` collection
#[derive(Clone)]
pub struct PostRepository {
    store: SharedStore,
}

impl PostRepository {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> StoreResult<Vec<Document>> {
        self.store.find_many(Collection::Posts, Filter::All).await
    }

    pub async fn find_by_id(&self, id: ObjectId) -> StoreResult<Option<Document>> {
        self.store.find_one(Collection::Posts, Filter::ById(id)).await
    }

    pub async fn create(&self, post: Document) -> StoreResult<InsertResult> {
        self.store.insert_one(Collection::Posts, post).await
    }

    /// Delete by id; an unmatched id yields `deleted_count == 0`
    pub async fn delete(&self, id: ObjectId) -> StoreResult<DeleteResult> {
        self.store.delete_one(Collection::Posts, Filter::ById(id)).await
    }

    /// Overwrite the react list (upsert)
    pub async fn set_reacts(&self, id: ObjectId, reacts: Vec<Bson>) -> StoreResult<UpdateResult> {
        let mut set = Document::new();
        set.insert(REACTS_FIELD, reacts);

        self.store
            .update_one(Collection::Posts, Filter::ById(id), set, true)
            .await
    }

    /// Replace the `post` content field (upsert)
    pub async fn replace_content(&self, id: ObjectId, content: Bson) -> StoreResult<UpdateResult> {
        let mut set = Document::new();
        set.insert(POST_CONTENT_FIELD, content);

        self.store
            .update_one(Collection::Posts, Filter::ById(id), set, true)
            .await
    }
}
