use actix_web::HttpResponse;
use serde_json::json;

/// Liveness probe used by the bot and deploy tooling.
pub async fn status_handler() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}
