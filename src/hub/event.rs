use chrono::Utc;
use serde::Serialize;

/// Which ledger file changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerKind {
    Blocks,
    Rewards,
}

/// Server-to-client notification. Carries no ledger data: clients re-fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LedgerEvent {
    BlockUpdate { timestamp: i64 },
    RewardsUpdate { timestamp: i64 },
}

impl LedgerEvent {
    /// Event for `kind`, stamped with the current epoch milliseconds.
    pub fn now(kind: LedgerKind) -> Self {
        Self::at(kind, Utc::now().timestamp_millis())
    }

    pub fn at(kind: LedgerKind, timestamp: i64) -> Self {
        match kind {
            LedgerKind::Blocks => Self::BlockUpdate { timestamp },
            LedgerKind::Rewards => Self::RewardsUpdate { timestamp },
        }
    }

    pub fn kind(&self) -> LedgerKind {
        match self {
            Self::BlockUpdate { .. } => LedgerKind::Blocks,
            Self::RewardsUpdate { .. } => LedgerKind::Rewards,
        }
    }
}
