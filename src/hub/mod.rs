//! Per-connection change notifications for the ledger files.
//!
//! Every accepted WebSocket connection gets its own pair of file watches
//! (one per ledger file). A change pushes a small JSON event naming the file
//! that changed; no ledger data travels over the socket. Watches are released
//! when the connection ends, and nothing is queued for closed connections.

pub mod connection;
pub mod event;
pub mod protocol;
pub mod subscription;
pub mod watch;

use std::sync::Arc;

use log::{error, info};

use crate::error::HubError;
use crate::ledger::LedgerFiles;

pub use event::{LedgerEvent, LedgerKind};
pub use protocol::{Negotiation, RESERVED_PROTOCOL, negotiate};
pub use subscription::Subscription;
pub use watch::{FsWatcher, ManualWatcher, WatchHandle, Watcher};

pub struct NotificationHub {
    files: LedgerFiles,
    watcher: Arc<dyn Watcher>,
}

impl NotificationHub {
    /// Bootstrap the ledger files once and return a hub ready to accept
    /// connections.
    pub async fn start(files: LedgerFiles, watcher: Arc<dyn Watcher>) -> Result<Self, HubError> {
        if let Err(e) = files.ensure_exist().await {
            error!("HUB - ledger bootstrap failed: {e}");
            return Err(e);
        }
        info!("HUB - watching ledger files in {}", files.dir.display());
        Ok(Self { files, watcher })
    }

    /// Open the watches for a new connection.
    pub fn subscribe(&self) -> Result<Subscription, HubError> {
        Subscription::open(self.watcher.as_ref(), &self.files)
    }
}
