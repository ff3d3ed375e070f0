pub mod account;

use actix_web::HttpResponse;

/// Liveness probe
///
/// GET /health
pub async fn health_handler() -> HttpResponse {
  HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}
