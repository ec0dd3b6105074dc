use actix_web::{HttpResponse, Responder, get, web};
use log::error;

use super::models::{AppState, BlocksQuery, BlocksResponse, RewardsResponse};

/// Newest rows of the block ledger, highest block number first.
#[get("/blocks/")]
pub async fn get_blocks(
    state: web::Data<AppState>,
    query: web::Query<BlocksQuery>,
) -> impl Responder {
    let limit = query.limit.unwrap_or(state.blocks_limit);
    match state.reader.read_blocks(limit).await {
        Ok(blocks) => HttpResponse::Ok().json(BlocksResponse {
            count: blocks.len(),
            blocks,
        }),
        Err(e) => {
            error!("API - reading block ledger failed: {e}");
            HttpResponse::InternalServerError().body(e.to_string())
        }
    }
}

#[get("/rewards/")]
pub async fn get_rewards(state: web::Data<AppState>) -> impl Responder {
    match state.reader.read_rewards().await {
        Ok(rewards) => HttpResponse::Ok().json(RewardsResponse {
            count: rewards.len(),
            rewards,
        }),
        Err(e) => {
            error!("API - reading rewards ledger failed: {e}");
            HttpResponse::InternalServerError().body(e.to_string())
        }
    }
}
