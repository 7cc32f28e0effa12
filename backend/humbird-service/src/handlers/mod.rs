/// HTTP handlers for HumBird endpoints
///
/// - Users: create, get by email
/// - Posts: list, get, create, delete, toggle react, replace content
/// - Health: server status, liveness, readiness
///
/// Every handler expects a `web::Data<SharedStore>` registered on the app.
use actix_web::web;

use crate::error::AppError;

pub mod health;
pub mod posts;
pub mod users;

pub use health::{liveness_check, readiness_check, server_status};
pub use posts::{
    create_post, delete_post, get_post, list_posts, replace_post_content, toggle_post_react,
};
pub use users::{create_user, get_user};

/// Register every route plus extractor settings that turn malformed bodies
/// and query strings into `{message}` errors.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::MalformedRequest(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::MalformedRequest(err.to_string()).into()),
    )
    .route("/", web::get().to(server_status))
    .route("/health/live", web::get().to(liveness_check))
    .route("/health/ready", web::get().to(readiness_check))
    .service(web::resource("/users").route(web::post().to(create_user)))
    .service(web::resource("/users/{email}").route(web::get().to(get_user)))
    .service(
        web::resource("/posts")
            .route(web::get().to(list_posts))
            .route(web::post().to(create_post))
            .route(web::delete().to(delete_post))
            .route(web::patch().to(toggle_post_react)),
    )
    .service(
        web::resource("/posts/{id}")
            .route(web::get().to(get_post))
            .route(web::put().to(replace_post_content)),
    );
}
