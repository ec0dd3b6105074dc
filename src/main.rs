use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;
use log::info;

use ledger_hub::blockchain::BlockStore;
use ledger_hub::hub::{FsWatcher, NotificationHub};
use ledger_hub::ledger::{LedgerCsvReader, LedgerFiles};
use ledger_hub::{AppState, Config, api};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let _ = dotenv();
    env_logger::init();

    let config = Config::from_env();

    let store = BlockStore::open(&config.blocks_dir)
        .await
        .map_err(std::io::Error::other)?;
    let files = LedgerFiles::new(&config.ledger_dir);
    let watcher = FsWatcher::new().map_err(std::io::Error::other)?;
    let hub = NotificationHub::start(files.clone(), Arc::new(watcher))
        .await
        .map_err(std::io::Error::other)?;

    let state = web::Data::new(AppState {
        store,
        reader: LedgerCsvReader::new(files),
        hub,
        blocks_limit: config.blocks_limit,
    });

    info!(
        "⛓️ Starting ledger hub at http://{}:{} (ws at /ws)",
        config.host, config.port
    );

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(api::init_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
