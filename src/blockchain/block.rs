use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Previous-hash sentinel carried by the genesis block.
pub const GENESIS_PREVIOUS_HASH: &str = "0";

/// A single immutable block in the hash chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub index: u64,
    pub timestamp: String, // RFC 3339, UTC
    pub data: Value,       // opaque payload supplied by the writer
    pub previous_hash: String,
    pub hash: String,
}

impl Block {
    /// Create a block stamped with the current time and its digest filled in.
    pub fn new(index: u64, data: Value, previous_hash: impl Into<String>) -> Self {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let previous_hash = previous_hash.into();
        let hash = calculate_hash(index, &timestamp, &data, &previous_hash);
        Self {
            index,
            timestamp,
            data,
            previous_hash,
            hash,
        }
    }

    /// Create the genesis block (index 0, sentinel previous hash).
    pub fn genesis(data: Value) -> Self {
        Self::new(0, data, GENESIS_PREVIOUS_HASH)
    }

    /// Build the successor of this block, linked through its hash.
    pub fn next(&self, data: Value) -> Self {
        Self::new(self.index + 1, data, self.hash.clone())
    }

    pub fn compute_hash(&self) -> String {
        calculate_hash(self.index, &self.timestamp, &self.data, &self.previous_hash)
    }

    /// Whether the cached `hash` matches the block content.
    /// Does NOT check linkage to the predecessor.
    pub fn has_valid_hash(&self) -> bool {
        self.hash == self.compute_hash()
    }
}

/// SHA-256 over `index ‖ timestamp ‖ data ‖ previous_hash`, hex encoded.
///
/// `data` is rendered with serde_json's compact form; object keys come out
/// sorted, so equal payloads always hash the same.
pub fn calculate_hash(index: u64, timestamp: &str, data: &Value, previous_hash: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(index.to_string().as_bytes());
    hasher.update(timestamp.as_bytes());
    hasher.update(data.to_string().as_bytes());
    hasher.update(previous_hash.as_bytes());
    hex::encode(hasher.finalize())
}
