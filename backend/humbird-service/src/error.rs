/// Error types for HumBird Service
///
/// Every handler error is rendered as `{"message": "..."}`. Only not-found
/// and duplicate-user conditions get their own status codes; malformed
/// input and store failures all surface as 500.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use thiserror::Error;

use crate::db::StoreError;

/// Result type for humbird-service operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types
#[derive(Debug, Error)]
pub enum AppError {
    /// Document store operation failed
    #[error("{0}")]
    Store(#[from] StoreError),

    /// Identifier is not a valid ObjectId
    #[error("{0}")]
    InvalidId(#[from] bson::oid::Error),

    /// Request body cannot be stored as a document
    #[error("{0}")]
    InvalidDocument(String),

    /// Body or query string could not be extracted
    #[error("{0}")]
    MalformedRequest(String),

    /// Resource not found
    #[error("{0}")]
    NotFound(String),

    /// Duplicate resource
    #[error("{0}")]
    Conflict(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Store(_)
            | AppError::InvalidId(_)
            | AppError::InvalidDocument(_)
            | AppError::MalformedRequest(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        HttpResponse::build(status).json(serde_json::json!({
            "message": self.to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn status_codes() {
        assert_eq!(
            AppError::NotFound("No post found.".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Conflict("User already exists.".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::MalformedRequest("bad json".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Store(StoreError::Unavailable("down".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[actix_web::test]
    async fn body_carries_message_only() {
        let response = AppError::NotFound("No user found.".into()).error_response();
        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json, serde_json::json!({ "message": "No user found." }));
    }
}
