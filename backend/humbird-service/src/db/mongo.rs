use async_trait::async_trait;
use bson::{doc, Document};
use futures::TryStreamExt;
use mongodb::options::UpdateOptions;
use mongodb::Database;

use super::{Collection, DocumentStore, Filter, StoreResult};
use crate::models::{DeleteResult, InsertResult, UpdateResult};

/// MongoDB-backed store
#[derive(Clone)]
pub struct MongoStore {
    database: Database,
}

impl MongoStore {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    fn collection(&self, collection: Collection) -> mongodb::Collection<Document> {
        self.database.collection(collection.name())
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn find_one(&self, collection: Collection, filter: Filter) -> StoreResult<Option<Document>> {
        let found = self
            .collection(collection)
            .find_one(filter.to_document(), None)
            .await?;
        Ok(found)
    }

    async fn find_many(&self, collection: Collection, filter: Filter) -> StoreResult<Vec<Document>> {
        let cursor = self
            .collection(collection)
            .find(filter.to_document(), None)
            .await?;
        let documents: Vec<Document> = cursor.try_collect().await?;
        Ok(documents)
    }

    async fn insert_one(&self, collection: Collection, document: Document) -> StoreResult<InsertResult> {
        let result = self.collection(collection).insert_one(document, None).await?;
        Ok(result.into())
    }

    async fn update_one(
        &self,
        collection: Collection,
        filter: Filter,
        set: Document,
        upsert: bool,
    ) -> StoreResult<UpdateResult> {
        let options = UpdateOptions::builder().upsert(upsert).build();
        let result = self
            .collection(collection)
            .update_one(filter.to_document(), doc! { "$set": set }, options)
            .await?;
        Ok(result.into())
    }

    async fn delete_one(&self, collection: Collection, filter: Filter) -> StoreResult<DeleteResult> {
        let result = self
            .collection(collection)
            .delete_one(filter.to_document(), None)
            .await?;
        Ok(result.into())
    }

    async fn ping(&self) -> StoreResult<()> {
        self.database.run_command(doc! { "ping": 1 }, None).await?;
        Ok(())
    }
}
