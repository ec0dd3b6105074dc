use std::io::ErrorKind;
use std::path::Path;
use std::str::FromStr;

use csv::{ReaderBuilder, StringRecord};
use tokio::fs;

use super::files::LedgerFiles;
use super::records::{BlockRecord, RewardRecord};
use crate::error::LedgerError;

/// Default number of rows returned by [`LedgerCsvReader::read_blocks`].
pub const DEFAULT_BLOCKS_LIMIT: usize = 50;

/// Stateless reader over the ledger files; the files belong to the writer.
#[derive(Debug, Clone)]
pub struct LedgerCsvReader {
    files: LedgerFiles,
}

impl LedgerCsvReader {
    pub fn new(files: LedgerFiles) -> Self {
        Self { files }
    }

    /// Newest `limit` rows of `Blocks.csv`, sorted by block number descending.
    pub async fn read_blocks(&self, limit: usize) -> Result<Vec<BlockRecord>, LedgerError> {
        let mut records = read_rows(&self.files.blocks, |row| BlockRecord {
            block_number: row.number("Block Number"),
            timestamp: row.text("Timestamp"),
            target_distance: row.number("Target Distance"),
            winner_id: row.number("Winner ID"),
            travel_distance: row.number("Travel Distance"),
            miner_address: row.text("Miner Address"),
            block_hash: row.text("Block Hash"),
        })
        .await?;

        records.sort_by(|a, b| b.block_number.cmp(&a.block_number));
        records.truncate(limit);
        Ok(records)
    }

    /// All rows of `mining_rewards.csv`, in file order.
    pub async fn read_rewards(&self) -> Result<Vec<RewardRecord>, LedgerError> {
        read_rows(&self.files.rewards, |row| RewardRecord {
            miner_address: row.text("Miner Address"),
            total_rewards: row.number("Total Rewards"),
        })
        .await
    }
}

/// Header-addressed view of a single data row.
struct Row<'a> {
    headers: &'a StringRecord,
    record: &'a StringRecord,
}

impl Row<'_> {
    fn get(&self, column: &str) -> Option<&str> {
        let position = self.headers.iter().position(|h| h.trim() == column)?;
        self.record.get(position).map(str::trim)
    }

    fn text(&self, column: &str) -> String {
        self.get(column).unwrap_or_default().to_string()
    }

    /// Absent or unparsable numbers read as zero.
    fn number<T: FromStr + Default>(&self, column: &str) -> T {
        self.get(column)
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    }
}

/// Missing file reads as empty; any malformed row fails the whole read.
async fn read_rows<T>(path: &Path, map: impl Fn(Row<'_>) -> T) -> Result<Vec<T>, LedgerError> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes.as_slice());
    let headers = reader.headers()?.clone();

    let mut out = Vec::new();
    for record in reader.records() {
        let record = record?;
        out.push(map(Row {
            headers: &headers,
            record: &record,
        }));
    }
    Ok(out)
}
