/// Health endpoints
use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Serialize;

use crate::db::SharedStore;

#[derive(Serialize)]
struct ReadinessResponse {
    ready: bool,
    store: String,
    timestamp: String,
}

/// `GET /` - process is up and serving
pub async fn server_status() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "msg": "Server is running..." }))
}

pub async fn liveness_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "alive": true }))
}

/// Ready only when the document store answers a ping
pub async fn readiness_check(store: web::Data<SharedStore>) -> HttpResponse {
    let (ready, status) = match store.ping().await {
        Ok(()) => (true, "ok".to_string()),
        Err(e) => {
            tracing::warn!(error = %e, "Document store ping failed");
            (false, e.to_string())
        }
    };

    let response = ReadinessResponse {
        ready,
        store: status,
        timestamp: Utc::now().to_rfc3339(),
    };

    if ready {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}
