use actix_web::{HttpResponse, Responder, get, web};
use log::warn;

use super::models::{AppState, HealthResponse, latest_index};

/// Liveness plus a cheap probe of the block directory.
#[get("/health/")]
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    match state.store.latest_block_index().await {
        Ok(latest) => HttpResponse::Ok().json(HealthResponse {
            status: "ok",
            latest_index: latest_index(latest),
        }),
        Err(e) => {
            warn!("API - health probe failed: {e}");
            HttpResponse::ServiceUnavailable().body(e.to_string())
        }
    }
}
