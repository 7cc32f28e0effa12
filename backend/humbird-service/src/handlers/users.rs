/// User handlers - HTTP endpoints for user operations
use actix_web::{web, HttpResponse};
use bson::Bson;
use serde_json::Value;

use crate::db::{SharedStore, UserRepository};
use crate::error::{AppError, Result};
use crate::models::{document_to_json, json_to_document};

/// Create a user unless one with the same email already exists.
///
/// The existence check and the insert are separate store calls, so two
/// concurrent requests for the same email can both insert.
pub async fn create_user(store: web::Data<SharedStore>, body: web::Json<Value>) -> Result<HttpResponse> {
    let user = json_to_document(body.into_inner())?;
    let email = user.get("email").cloned().unwrap_or(Bson::Null);

    let users = UserRepository::new(store.get_ref().clone());
    if users.find_by_email(email.clone()).await?.is_some() {
        tracing::info!(email = %email, "Rejected duplicate user");
        return Err(AppError::Conflict("User already exists.".to_string()));
    }

    let result = users.create(user).await?;
    tracing::info!(email = %email, "Created user");

    Ok(HttpResponse::Created().json(result))
}

/// Get a user by email
pub async fn get_user(store: web::Data<SharedStore>, email: web::Path<String>) -> Result<HttpResponse> {
    let users = UserRepository::new(store.get_ref().clone());

    match users.find_by_email(email.into_inner()).await? {
        Some(user) => Ok(HttpResponse::Ok().json(document_to_json(user))),
        None => Err(AppError::NotFound("No user found.".to_string())),
    }
}
