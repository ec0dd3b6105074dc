use serde::Serialize;

pub const BLOCKS_HEADER: &str =
    "Block Number,Timestamp,Target Distance,Winner ID,Travel Distance,Miner Address,Block Hash";
pub const REWARDS_HEADER: &str = "Miner Address,Total Rewards";

/// One row of `Blocks.csv`, a display projection written by the miner.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockRecord {
    pub block_number: u64,
    pub timestamp: String,
    pub target_distance: f64,
    pub winner_id: u64,
    pub travel_distance: f64,
    pub miner_address: String,
    pub block_hash: String,
}

/// One row of `mining_rewards.csv`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardRecord {
    pub miner_address: String,
    pub total_rewards: f64,
}
