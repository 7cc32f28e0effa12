/// In-process document store
///
/// Mirrors the MongoDB semantics the service relies on: `_id` assignment on
/// insert, first-match update and delete, and upsert seeding the new
/// document from the filter. Used for local development
/// (`STORE_BACKEND=memory`) and by the test suite.
use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{Bson, Document};
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{Collection, DocumentStore, Filter, StoreError, StoreResult};
use crate::models::{DeleteResult, InsertResult, UpdateResult};

#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// `_id` first, then the remaining fields in their original order
fn with_id(id: Bson, document: Document) -> Document {
    let mut stored = Document::new();
    stored.insert("_id", id);
    for (key, value) in document {
        if key != "_id" {
            stored.insert(key, value);
        }
    }
    stored
}

fn upsert_seed(filter: &Filter) -> (Bson, Document) {
    match filter {
        Filter::ById(id) => (Bson::ObjectId(*id), Document::new()),
        Filter::FieldEq { field, value } => {
            let mut seed = Document::new();
            seed.insert(field.clone(), value.clone());
            (Bson::ObjectId(ObjectId::new()), seed)
        }
        Filter::All => (Bson::ObjectId(ObjectId::new()), Document::new()),
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find_one(&self, collection: Collection, filter: Filter) -> StoreResult<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|docs| docs.iter().find(|doc| filter.matches(doc)).cloned()))
    }

    async fn find_many(&self, collection: Collection, filter: Filter) -> StoreResult<Vec<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .map(|docs| docs.iter().filter(|doc| filter.matches(doc)).cloned().collect())
            .unwrap_or_default())
    }

    async fn insert_one(&self, collection: Collection, document: Document) -> StoreResult<InsertResult> {
        let id = document
            .get("_id")
            .cloned()
            .unwrap_or_else(|| Bson::ObjectId(ObjectId::new()));
        let stored = with_id(id.clone(), document);

        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection).or_default();
        if docs.iter().any(|doc| doc.get("_id") == Some(&id)) {
            return Err(StoreError::DuplicateKey {
                collection: collection.name(),
                id,
            });
        }
        docs.push(stored);

        Ok(InsertResult {
            acknowledged: true,
            inserted_id: id,
        })
    }

    async fn update_one(
        &self,
        collection: Collection,
        filter: Filter,
        set: Document,
        upsert: bool,
    ) -> StoreResult<UpdateResult> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection).or_default();

        if let Some(existing) = docs.iter_mut().find(|doc| filter.matches(doc)) {
            let mut modified = false;
            for (key, value) in set {
                if existing.get(&key) != Some(&value) {
                    existing.insert(key, value);
                    modified = true;
                }
            }

            return Ok(UpdateResult {
                acknowledged: true,
                matched_count: 1,
                modified_count: u64::from(modified),
                upserted_count: 0,
                upserted_id: None,
            });
        }

        if !upsert {
            return Ok(UpdateResult {
                acknowledged: true,
                matched_count: 0,
                modified_count: 0,
                upserted_count: 0,
                upserted_id: None,
            });
        }

        let (id, mut seed) = upsert_seed(&filter);
        for (key, value) in set {
            seed.insert(key, value);
        }
        docs.push(with_id(id.clone(), seed));

        Ok(UpdateResult {
            acknowledged: true,
            matched_count: 0,
            modified_count: 0,
            upserted_count: 1,
            upserted_id: Some(id),
        })
    }

    async fn delete_one(&self, collection: Collection, filter: Filter) -> StoreResult<DeleteResult> {
        let mut collections = self.collections.write().await;
        let deleted = match collections.get_mut(&collection) {
            Some(docs) => match docs.iter().position(|doc| filter.matches(doc)) {
                Some(index) => {
                    docs.remove(index);
                    1
                }
                None => 0,
            },
            None => 0,
        };

        Ok(DeleteResult {
            acknowledged: true,
            deleted_count: deleted,
        })
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
