use bson::{Bson, Document};

use super::{Collection, Filter, SharedStore, StoreResult};
use crate::models::InsertResult;

/// Repository for the `users` collection
#[derive(Clone)]
pub struct UserRepository {
    store: SharedStore,
}

impl UserRepository {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Find a user by email. `Bson::Null` matches users without an email.
    pub async fn find_by_email(&self, email: impl Into<Bson>) -> StoreResult<Option<Document>> {
        self.store
            .find_one(Collection::Users, Filter::field_eq("email", email))
            .await
    }

    pub async fn create(&self, user: Document) -> StoreResult<InsertResult> {
        self.store.insert_one(Collection::Users, user).await
    }
}
