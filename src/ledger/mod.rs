pub mod files;
pub mod reader;
pub mod records;

pub use files::{BLOCKS_FILE, LedgerFiles, REWARDS_FILE};
pub use reader::{DEFAULT_BLOCKS_LIMIT, LedgerCsvReader};
pub use records::{BLOCKS_HEADER, BlockRecord, REWARDS_HEADER, RewardRecord};
