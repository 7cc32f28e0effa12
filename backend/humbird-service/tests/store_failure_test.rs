//! Store errors must surface as 500 `{message}` responses, never panics.

use actix_web::{http::StatusCode, test, web, App};
use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{doc, Document};
use humbird_service::db::{Collection, DocumentStore, Filter, SharedStore, StoreError, StoreResult};
use humbird_service::handlers;
use humbird_service::models::{DeleteResult, InsertResult, UpdateResult};
use mockall::mock;
use serde_json::{json, Value};
use std::sync::Arc;

mock! {
    pub Store {}

    #[async_trait]
    impl DocumentStore for Store {
        async fn find_one(&self, collection: Collection, filter: Filter) -> StoreResult<Option<Document>>;
        async fn find_many(&self, collection: Collection, filter: Filter) -> StoreResult<Vec<Document>>;
        async fn insert_one(&self, collection: Collection, document: Document) -> StoreResult<InsertResult>;
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
}

fn connection_reset() -> StoreError {
    StoreError::Unavailable("connection reset by peer".to_string())
}

async fn call(store: MockStore, req: test::TestRequest) -> (StatusCode, Value) {
    let store: SharedStore = Arc::new(store);
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(store))
            .configure(handlers::configure),
    )
    .await;

    let resp = test::call_service(&app, req.to_request()).await;
    let status = resp.status();
    let body: Value = test::read_body_json(resp).await;
    (status, body)
}

#[actix_web::test]
async fn test_list_posts_store_error() {
    let mut store = MockStore::new();
    store
        .expect_find_many()
        .times(1)
        .returning(|_, _| Err(connection_reset()));

    let (status, body) = call(store, test::TestRequest::get().uri("/posts")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "message": "connection reset by peer" }));
}

#[actix_web::test]
async fn test_create_user_insert_error() {
    let mut store = MockStore::new();
    store
        .expect_find_one()
        .withf(|collection, filter| {
            *collection == Collection::Users && *filter == Filter::field_eq("email", "ada@humbird.app")
        })
        .times(1)
        .returning(|_, _| Ok(None));
    store
        .expect_insert_one()
        .times(1)
        .returning(|_, _| Err(connection_reset()));

    let (status, body) = call(
        store,
        test::TestRequest::post()
            .uri("/users")
            .set_json(json!({ "email": "ada@humbird.app" })),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], json!("connection reset by peer"));
}

#[actix_web::test]
async fn test_create_user_without_email_checks_null() {
    let mut store = MockStore::new();
    store
        .expect_find_one()
        .withf(|_, filter| *filter == Filter::field_eq("email", bson::Bson::Null))
        .times(1)
        .returning(|_, _| Ok(Some(doc! { "name": "anonymous" })));
    store.expect_insert_one().never();

    let (status, _) = call(
        store,
        test::TestRequest::post()
            .uri("/users")
            .set_json(json!({ "name": "second anonymous" })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[actix_web::test]
async fn test_toggle_react_update_error() {
    let id = ObjectId::new();

    let mut store = MockStore::new();
    store
        .expect_find_one()
        .returning(move |_, _| Ok(Some(doc! { "_id": id, "reacts": ["ada@humbird.app"] })));
    store
        .expect_update_one()
        .withf(move |collection, filter, set, upsert| {
            *collection == Collection::Posts
                && *filter == Filter::ById(id)
                && *set == doc! { "reacts": ["ada@humbird.app", "bob@humbird.app"] }
                && *upsert
        })
        .times(1)
        .returning(|_, _, _, _| Err(connection_reset()));

    let (status, body) = call(
        store,
        test::TestRequest::patch().uri(&format!("/posts?id={}&email=bob@humbird.app", id)),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], json!("connection reset by peer"));
}

#[actix_web::test]
async fn test_invalid_id_never_reaches_store() {
    let mut store = MockStore::new();
    store.expect_find_one().never();
    store.expect_delete_one().never();

    let (status, _) = call(store, test::TestRequest::get().uri("/posts/zzz")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}
