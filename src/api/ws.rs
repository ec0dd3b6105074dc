use actix_web::{HttpRequest, HttpResponse, get, web};

use super::models::AppState;
use crate::hub::connection;

/// Upgrade to a WebSocket that receives ledger change notifications.
#[get("/ws")]
pub async fn connect(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Payload,
) -> Result<HttpResponse, actix_web::Error> {
    connection::accept(&state.hub, &req, body)
}
