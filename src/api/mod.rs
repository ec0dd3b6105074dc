mod chain;
mod health;
mod ledger;
pub mod models;
mod ws;

use actix_web::web::{self, ServiceConfig};

pub use models::AppState;

pub fn init_routes(cfg: &mut ServiceConfig) {
    cfg.service(ws::connect).service(
        web::scope("/api/v1")
            .service(health::health_check)
            .service(ledger::get_blocks)
            .service(ledger::get_rewards)
            .service(chain::get_chain)
            .service(chain::validate_chain)
            .service(chain::get_block),
    );
}
