use serde::{Deserialize, Serialize};

use crate::blockchain::{Block, BlockStore};
use crate::hub::NotificationHub;
use crate::ledger::{BlockRecord, LedgerCsvReader, RewardRecord};

/// Shared application state: the block store, the ledger reader and the hub.
pub struct AppState {
    pub store: BlockStore,
    pub reader: LedgerCsvReader,
    pub hub: NotificationHub,
    pub blocks_limit: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub latest_index: i64,
}

/// Render an optional index for JSON: `-1` when absent, saturating at `i64::MAX`.
pub fn latest_index(index: Option<u64>) -> i64 {
    index.map_or(-1, |i| i64::try_from(i).unwrap_or(i64::MAX))
}

/* ---------- Chain API Models ---------- */

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainResponse {
    pub length: usize,
    pub latest_index: i64, // -1 when the chain is empty
    pub chain: Vec<Block>,
}

#[derive(Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/* ---------- Ledger API Models ---------- */

#[derive(Deserialize)]
pub struct BlocksQuery {
    pub limit: Option<usize>,
}

#[derive(Serialize)]
pub struct BlocksResponse {
    pub count: usize,
    pub blocks: Vec<BlockRecord>,
}

#[derive(Serialize)]
pub struct RewardsResponse {
    pub count: usize,
    pub rewards: Vec<RewardRecord>,
}
