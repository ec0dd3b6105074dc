#![allow(dead_code)]

use std::sync::Arc;

use actix_web::web;
use ledger_hub::AppState;
use ledger_hub::blockchain::BlockStore;
use ledger_hub::hub::{NotificationHub, Watcher};
use ledger_hub::ledger::{LedgerCsvReader, LedgerFiles};
use tempfile::TempDir;

pub struct Fixture {
    pub tmp: TempDir,
    pub files: LedgerFiles,
    pub state: web::Data<AppState>,
}

pub async fn fixture(watcher: Arc<dyn Watcher>) -> Fixture {
    let tmp = TempDir::new().unwrap();
    let store = BlockStore::open(tmp.path().join("blocks")).await.unwrap();
    let files = LedgerFiles::new(tmp.path().join("ledger"));
    let hub = NotificationHub::start(files.clone(), watcher).await.unwrap();

    let state = web::Data::new(AppState {
        store,
        reader: LedgerCsvReader::new(files.clone()),
        hub,
        blocks_limit: 50,
    });
    Fixture { tmp, files, state }
}
