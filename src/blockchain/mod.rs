pub mod block;
pub mod chain;
pub mod store;

pub use block::{Block, GENESIS_PREVIOUS_HASH, calculate_hash};
pub use chain::verify_chain;
pub use store::BlockStore;
