use log::debug;

use super::event::{LedgerEvent, LedgerKind};
use super::watch::{WatchHandle, Watcher};
use crate::error::HubError;
use crate::ledger::LedgerFiles;

/// The two watches owned by one open connection.
#[derive(Debug)]
pub struct Subscription {
    blocks: WatchHandle,
    rewards: WatchHandle,
}

impl Subscription {
    pub fn open(watcher: &dyn Watcher, files: &LedgerFiles) -> Result<Self, HubError> {
        let blocks = watcher.subscribe(&files.blocks)?;
        let rewards = watcher.subscribe(&files.rewards)?;
        debug!(
            "HUB - subscribed to {} and {}",
            blocks.path().display(),
            rewards.path().display()
        );
        Ok(Self { blocks, rewards })
    }

    /// Next change on either file, one event per change.
    ///
    /// Cancel-safe. Returns `None` only when both watches have shut down.
    pub async fn next_event(&mut self) -> Option<LedgerEvent> {
        tokio::select! {
            Some(()) = self.blocks.changed() => Some(LedgerEvent::now(LedgerKind::Blocks)),
            Some(()) = self.rewards.changed() => Some(LedgerEvent::now(LedgerKind::Rewards)),
            else => None,
        }
    }

    /// Release both watches.
    pub fn dispose(self) {}
}
