use actix_web::{HttpResponse, Responder, get, web};
use log::{error, warn};

use super::models::{AppState, ChainResponse, ValidateResponse, latest_index};
use crate::error::StoreError;

/// Get the full stored chain.
#[get("/chain/")]
pub async fn get_chain(state: web::Data<AppState>) -> impl Responder {
    match state.store.get_all_blocks().await {
        Ok(chain) => HttpResponse::Ok().json(ChainResponse {
            length: chain.len(),
            latest_index: latest_index(chain.last().map(|b| b.index)),
            chain,
        }),
        Err(e) => store_error(e),
    }
}

/// Audit the stored chain: hashes, linkage and gapless indices.
#[get("/chain/validate/")]
pub async fn validate_chain(state: web::Data<AppState>) -> impl Responder {
    match state.store.verify().await {
        Ok(Ok(length)) => HttpResponse::Ok().json(ValidateResponse {
            valid: true,
            length: Some(length),
            error: None,
        }),
        Ok(Err(violation)) => {
            warn!("API - chain audit failed: {violation}");
            HttpResponse::Ok().json(ValidateResponse {
                valid: false,
                length: None,
                error: Some(violation.to_string()),
            })
        }
        Err(e) => store_error(e),
    }
}

/// Get one block by index.
#[get("/chain/{index}/")]
pub async fn get_block(state: web::Data<AppState>, path: web::Path<(u64,)>) -> impl Responder {
    let index = path.into_inner().0;
    match state.store.get_block(index).await {
        Ok(Some(block)) => HttpResponse::Ok().json(block),
        Ok(None) => HttpResponse::NotFound().body(format!("block {index} not found")),
        Err(e) => store_error(e),
    }
}

fn store_error(e: StoreError) -> HttpResponse {
    match e {
        StoreError::MissingBlock { .. } => HttpResponse::Conflict().body(e.to_string()),
        _ => {
            error!("API - block store failure: {e}");
            HttpResponse::InternalServerError().body(e.to_string())
        }
    }
}
