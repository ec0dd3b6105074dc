use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures of the on-disk block store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The storage directory could not be created.
    #[error("cannot initialise block directory {path}: {source}")]
    Init {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("block store I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("block (de)serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A full read found no file for an index below the latest one.
    #[error("block {index} is missing (latest stored index is {latest})")]
    MissingBlock { index: u64, latest: u64 },
}

/// Failures while reading the ledger CSV files.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("ledger I/O error: {0}")]
    Io(#[from] io::Error),

    /// A malformed row; the whole read is abandoned.
    #[error("malformed ledger file: {0}")]
    Parse(#[from] csv::Error),
}

/// Failures of the change-notification hub.
#[derive(Debug, Error)]
pub enum HubError {
    /// The ledger directory or one of its files could not be created.
    #[error("cannot bootstrap ledger file {path}: {source}")]
    Bootstrap {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("file watch error: {0}")]
    Watch(#[from] notify::Error),
}

/// First inconsistency found by a chain audit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainViolation {
    #[error("expected block index {expected}, found {found}")]
    IndexMismatch { expected: u64, found: u64 },

    #[error("block {index} hash does not match its content")]
    HashMismatch { index: u64 },

    #[error("block {index} does not link to its predecessor")]
    BrokenLink { index: u64 },

    /// No file exists for an index below the latest one.
    #[error("block {index} is missing")]
    MissingBlock { index: u64 },
}
