/// HTTP middleware for humbird-service
use actix_cors::Cors;

use crate::config::CorsConfig;

/// Preflight cache lifetime, in seconds
const CORS_MAX_AGE: usize = 3600;

/// Build the CORS layer. `*` anywhere in the origin list opens every origin;
/// otherwise only the listed origins are accepted.
pub fn build_cors(config: &CorsConfig) -> Cors {
    let cors = if config.allows_any_origin() {
        Cors::default().allow_any_origin()
    } else {
        config
            .origins()
            .into_iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
    };

    cors.allow_any_method()
        .allow_any_header()
        .max_age(CORS_MAX_AGE)
}
