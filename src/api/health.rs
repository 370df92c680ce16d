use actix_web::{get, web, HttpResponse, Responder};
use serde::Serialize;

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: String,
    service: String,
}

impl HealthResponse {
    fn new(status: &str) -> Self {
        HealthResponse {
            status: status.to_string(),
            service: env!("CARGO_PKG_NAME").to_string(),
        }
    }
}

/// Health check endpoint
///
/// The service has no external dependencies, so it is healthy whenever it
/// answers.
#[get("/health")]
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse::new("healthy"))
}

/// Readiness check endpoint
///
/// Validation holds no connections or caches, so the service is ready as
/// soon as it accepts requests.
#[get("/ready")]
async fn readiness_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse::new("ready"))
}

/// Liveness check endpoint
///
/// Simple check that the process is alive.
#[get("/live")]
async fn liveness_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse::new("alive"))
}

pub fn health_config(config: &mut web::ServiceConfig) {
    config
        .service(health_check)
        .service(readiness_check)
        .service(liveness_check);
}
