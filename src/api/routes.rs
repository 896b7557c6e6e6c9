use actix_web::web;

use super::handlers;
use crate::error::ApiError;

/// Register all API routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(json_config())
            .route("/health", web::get().to(handlers::health))
            .service(
                web::scope("/triage")
                    .route("/questionnaire", web::get().to(handlers::questionnaire))
                    .route("/assessments", web::post().to(handlers::create_assessment)),
            )
            .service(
                web::scope("/appointments")
                    .route("/statuses", web::get().to(handlers::statuses))
                    .route("/categorize", web::post().to(handlers::categorize))
                    .route("/search", web::post().to(handlers::search)),
            ),
    );
}

/// Report JSON extraction failures in the same `{ "error", "message" }` shape
/// as handler errors.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| ApiError::Payload(err.to_string()).into())
}
