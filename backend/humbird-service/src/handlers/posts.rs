/// Post handlers - HTTP endpoints for post operations
use actix_web::{web, HttpResponse};
use bson::Bson;
use serde::Deserialize;
use serde_json::Value;

use crate::db::{PostRepository, SharedStore};
use crate::error::{AppError, Result};
use crate::models::{
    document_to_json, json_to_bson, json_to_document, parse_object_id, reacts_of, toggle_react,
};

#[derive(Debug, Deserialize)]
pub struct PostIdQuery {
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ToggleReactQuery {
    pub id: Option<String>,
    pub email: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplacePostRequest {
    #[serde(default)]
    pub updated_post: Option<Value>,
}

fn posts(store: &web::Data<SharedStore>) -> PostRepository {
    PostRepository::new(store.get_ref().clone())
}

/// List every post
pub async fn list_posts(store: web::Data<SharedStore>) -> Result<HttpResponse> {
    let all = posts(&store).list().await?;

    if all.is_empty() {
        return Err(AppError::NotFound("No posts found.".to_string()));
    }

    let body: Vec<Value> = all.into_iter().map(document_to_json).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// Get a post by ID
pub async fn get_post(store: web::Data<SharedStore>, post_id: web::Path<String>) -> Result<HttpResponse> {
    let id = parse_object_id(Some(post_id.as_str()))?;

    match posts(&store).find_by_id(id).await? {
        Some(post) => Ok(HttpResponse::Ok().json(document_to_json(post))),
        None => Err(AppError::NotFound("No post found.".to_string())),
    }
}

/// Create a new post
pub async fn create_post(store: web::Data<SharedStore>, body: web::Json<Value>) -> Result<HttpResponse> {
    let post = json_to_document(body.into_inner())?;
    let result = posts(&store).create(post).await?;

    tracing::info!(post_id = %result.inserted_id, "Created post");
    Ok(HttpResponse::Created().json(result))
}

/// Delete a post; succeeds with a zero count when nothing matched
pub async fn delete_post(store: web::Data<SharedStore>, query: web::Query<PostIdQuery>) -> Result<HttpResponse> {
    let id = parse_object_id(query.id.as_deref())?;
    let result = posts(&store).delete(id).await?;

    tracing::info!(post_id = %id, deleted = result.deleted_count, "Deleted post");
    Ok(HttpResponse::Ok().json(result))
}

/// Add or remove `email` from a post's reacts.
///
/// Read-modify-write without a guard: concurrent toggles on one post can
/// overwrite each other.
pub async fn toggle_post_react(
    store: web::Data<SharedStore>,
    query: web::Query<ToggleReactQuery>,
) -> Result<HttpResponse> {
    let id = parse_object_id(query.id.as_deref())?;
    let repo = posts(&store);

    let post = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found.".to_string()))?;

    let reacts = toggle_react(&reacts_of(&post), &query.email);
    let result = repo.set_reacts(id, reacts).await?;

    tracing::debug!(post_id = %id, email = %query.email, "Toggled react");
    Ok(HttpResponse::Ok().json(result))
}

/// Replace a post's content, creating the post when the id is unknown
pub async fn replace_post_content(
    store: web::Data<SharedStore>,
    post_id: web::Path<String>,
    body: web::Json<ReplacePostRequest>,
) -> Result<HttpResponse> {
    let id = parse_object_id(Some(post_id.as_str()))?;
    let content = match body.into_inner().updated_post {
        Some(value) => json_to_bson(value)?,
        None => Bson::Null,
    };

    let result = posts(&store).replace_content(id, content).await?;

    tracing::info!(post_id = %id, upserted = result.upserted_count, "Replaced post content");
    Ok(HttpResponse::Ok().json(result))
}
