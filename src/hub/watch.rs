use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use log::{debug, warn};
use notify::event::ModifyKind;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher as _};
use tokio::sync::mpsc;

use crate::error::HubError;

/// Source of change notifications for individual files.
pub trait Watcher: Send + Sync + 'static {
    /// Start watching `path`. The watch lives as long as the returned handle.
    fn subscribe(&self, path: &Path) -> Result<WatchHandle, HubError>;
}

/// A live watch on one file. Dropping it (or calling [`dispose`]) releases
/// the underlying registration.
///
/// [`dispose`]: WatchHandle::dispose
pub struct WatchHandle {
    path: PathBuf,
    changes: mpsc::UnboundedReceiver<()>,
    _registration: Box<dyn Send>,
}

impl WatchHandle {
    pub fn new(
        path: PathBuf,
        changes: mpsc::UnboundedReceiver<()>,
        registration: impl Send + 'static,
    ) -> Self {
        Self {
            path,
            changes,
            _registration: Box::new(registration),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Wait for the next change. `None` once the watcher backend is gone.
    pub async fn changed(&mut self) -> Option<()> {
        self.changes.recv().await
    }

    pub fn dispose(self) {}
}

impl fmt::Debug for WatchHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchHandle").field("path", &self.path).finish()
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        debug!("HUB - released watch on {}", self.path.display());
    }
}

/// Per-path fan-out table shared by the watcher implementations.
#[derive(Debug, Default)]
struct Registry {
    next_id: u64,
    subscribers: HashMap<PathBuf, HashMap<u64, mpsc::UnboundedSender<()>>>,
}

impl Registry {
    /// Register a sender; returns its id and whether it is the first on `path`.
    fn add(&mut self, path: &Path, tx: mpsc::UnboundedSender<()>) -> (u64, bool) {
        let id = self.next_id;
        self.next_id += 1;
        let subs = self.subscribers.entry(path.to_path_buf()).or_default();
        subs.insert(id, tx);
        (id, subs.len() == 1)
    }

    /// Remove a sender; returns true when `path` has no subscribers left.
    fn remove(&mut self, path: &Path, id: u64) -> bool {
        let Some(subs) = self.subscribers.get_mut(path) else {
            return false;
        };
        subs.remove(&id);
        if subs.is_empty() {
            self.subscribers.remove(path);
            return true;
        }
        false
    }

    fn notify(&self, path: &Path) -> usize {
        self.subscribers
            .get(path)
            .map(|subs| subs.values().filter(|tx| tx.send(()).is_ok()).count())
            .unwrap_or(0)
    }

    fn count(&self, path: &Path) -> usize {
        self.subscribers.get(path).map_or(0, HashMap::len)
    }
}

struct FsShared {
    // Held across watch/unwatch so registry and kernel watches change together.
    watcher: Mutex<RecommendedWatcher>,
    registry: Arc<Mutex<Registry>>,
}

/// Watcher backed by the platform's native file notification API.
///
/// One OS-level watcher serves every subscription; each watched path is
/// registered once no matter how many connections follow it.
#[derive(Clone)]
pub struct FsWatcher {
    shared: Arc<FsShared>,
}

impl FsWatcher {
    pub fn new() -> Result<Self, HubError> {
        let registry = Arc::new(Mutex::new(Registry::default()));
        let dispatch = Arc::clone(&registry);

        let watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) if is_content_change(&event.kind) => {
                let Ok(registry) = dispatch.lock() else {
                    return;
                };
                for path in &event.paths {
                    registry.notify(path);
                }
            }
            Ok(_) => {}
            Err(e) => warn!("HUB - watch error: {e}"),
        })?;

        Ok(Self {
            shared: Arc::new(FsShared {
                watcher: Mutex::new(watcher),
                registry,
            }),
        })
    }

    /// Number of live watches on `path`.
    pub fn active_watches(&self, path: &Path) -> usize {
        let Ok(path) = std::path::absolute(path) else {
            return 0;
        };
        let registry = self.shared.registry.lock().expect("mutex poisoned");
        registry.count(&path)
    }
}

impl fmt::Debug for FsWatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FsWatcher").finish_non_exhaustive()
    }
}

impl Watcher for FsWatcher {
    fn subscribe(&self, path: &Path) -> Result<WatchHandle, HubError> {
        // Events carry absolute paths.
        let path = std::path::absolute(path).map_err(notify::Error::io)?;
        let (tx, rx) = mpsc::unbounded_channel();

        let mut watcher = self.shared.watcher.lock().expect("mutex poisoned");
        let (id, first) = self
            .shared
            .registry
            .lock()
            .expect("mutex poisoned")
            .add(&path, tx);

        // The registry lock must not be held here: the event thread takes it.
        if first {
            if let Err(e) = watcher.watch(&path, RecursiveMode::NonRecursive) {
                self.shared
                    .registry
                    .lock()
                    .expect("mutex poisoned")
                    .remove(&path, id);
                return Err(e.into());
            }
            debug!("HUB - watching {}", path.display());
        }
        drop(watcher);

        let registration = FsRegistration {
            shared: Arc::clone(&self.shared),
            path: path.clone(),
            id,
        };
        Ok(WatchHandle::new(path, rx, registration))
    }
}

struct FsRegistration {
    shared: Arc<FsShared>,
    path: PathBuf,
    id: u64,
}

impl Drop for FsRegistration {
    fn drop(&mut self) {
        let Ok(mut watcher) = self.shared.watcher.lock() else {
            return;
        };
        let last = match self.shared.registry.lock() {
            Ok(mut registry) => registry.remove(&self.path, self.id),
            Err(_) => false,
        };
        if last {
            if let Err(e) = watcher.unwatch(&self.path) {
                debug!("HUB - unwatch {} failed: {e}", self.path.display());
            }
        }
    }
}

/// Create and modify events count, metadata-only changes do not.
///
/// Each kernel event is forwarded on its own: an append is one event, while a
/// truncate-and-rewrite of the file usually arrives as two.
fn is_content_change(kind: &EventKind) -> bool {
    match kind {
        EventKind::Modify(ModifyKind::Metadata(_)) => false,
        EventKind::Create(_) | EventKind::Modify(_) => true,
        _ => false,
    }
}

/// In-process watcher whose changes are signalled with [`trigger`].
///
/// Useful when the writer lives in the same process, and in tests, since it
/// reports how many watches are still registered per path.
///
/// [`trigger`]: ManualWatcher::trigger
#[derive(Debug, Default, Clone)]
pub struct ManualWatcher {
    registry: Arc<Mutex<Registry>>,
}

impl ManualWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal a change on `path`; returns how many watches were notified.
    pub fn trigger(&self, path: &Path) -> usize {
        self.registry.lock().expect("mutex poisoned").notify(path)
    }

    /// Number of live watches on `path`.
    pub fn active_watches(&self, path: &Path) -> usize {
        self.registry.lock().expect("mutex poisoned").count(path)
    }
}

impl Watcher for ManualWatcher {
    fn subscribe(&self, path: &Path) -> Result<WatchHandle, HubError> {
        let (tx, rx) = mpsc::unbounded_channel();
        let (id, _) = self.registry.lock().expect("mutex poisoned").add(path, tx);

        let registration = ManualRegistration {
            registry: Arc::clone(&self.registry),
            path: path.to_path_buf(),
            id,
        };
        Ok(WatchHandle::new(path.to_path_buf(), rx, registration))
    }
}

struct ManualRegistration {
    registry: Arc<Mutex<Registry>>,
    path: PathBuf,
    id: u64,
}

impl Drop for ManualRegistration {
    fn drop(&mut self) {
        if let Ok(mut registry) = self.registry.lock() {
            registry.remove(&self.path, self.id);
        }
    }
}
