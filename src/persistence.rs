//! Durable snapshot storage for per-session cart and checkout state.
//!
//! Stores read their snapshot once when opened and write the full snapshot
//! after every mutation. Snapshots are plain JSON values keyed by store name.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use dashmap::DashMap;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("snapshot io error")]
    Io(#[from] std::io::Error),

    #[error("snapshot encoding error")]
    Encoding(#[from] serde_json::Error),

    #[error("snapshot writer stopped")]
    WriterStopped,
}

pub trait SnapshotStore: Send + Sync {
    fn load(&self, name: &str) -> Result<Option<Value>, PersistError>;
    fn save(&self, name: &str, snapshot: &Value) -> Result<(), PersistError>;
}

/// Process-local snapshots, used by tests and demo setups.
#[derive(Debug, Default)]
pub struct MemorySnapshots {
    entries: DashMap<String, Value>,
}

impl MemorySnapshots {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemorySnapshots {
    fn load(&self, name: &str) -> Result<Option<Value>, PersistError> {
        Ok(self.entries.get(name).map(|entry| entry.value().clone()))
    }

    fn save(&self, name: &str, snapshot: &Value) -> Result<(), PersistError> {
        self.entries.insert(name.to_string(), snapshot.clone());
        Ok(())
    }
}

enum WriteRequest {
    Store(String),
    Flush(oneshot::Sender<()>),
}

/// One JSON file per store name inside a directory.
///
/// Saves are write-behind: the latest snapshot per name is queued in memory
/// and a background task writes it out, so callers never block on disk.
/// Queued snapshots are served by `load` until they reach disk.
#[derive(Clone)]
pub struct FileSnapshots {
    dir: PathBuf,
    pending: Arc<DashMap<String, Arc<Value>>>,
    writer: mpsc::UnboundedSender<WriteRequest>,
}

impl FileSnapshots {
    /// Must be called inside a Tokio runtime; the writer task is spawned here.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, PersistError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        let pending = Arc::new(DashMap::new());
        let (writer, rx) = mpsc::unbounded_channel();
        tokio::spawn(write_behind(dir.clone(), pending.clone(), rx));
        Ok(Self {
            dir,
            pending,
            writer,
        })
    }

    /// Wait until every snapshot saved so far has been written.
    pub async fn flush(&self) -> Result<(), PersistError> {
        let (done, rx) = oneshot::channel();
        self.writer
            .send(WriteRequest::Flush(done))
            .map_err(|_| PersistError::WriterStopped)?;
        rx.await.map_err(|_| PersistError::WriterStopped)
    }

    fn path_for(&self, name: &str) -> PathBuf {
        snapshot_path(&self.dir, name)
    }
}

fn snapshot_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.json"))
}

async fn write_behind(
    dir: PathBuf,
    pending: Arc<DashMap<String, Arc<Value>>>,
    mut rx: mpsc::UnboundedReceiver<WriteRequest>,
) {
    while let Some(request) = rx.recv().await {
        match request {
            WriteRequest::Store(name) => {
                // Several saves of one name collapse into a single write.
                let Some(snapshot) = pending.get(&name).map(|entry| entry.value().clone()) else {
                    continue;
                };
                match write_snapshot(&dir, &name, &snapshot).await {
                    Ok(()) => {
                        pending.remove_if(&name, |_, queued| Arc::ptr_eq(queued, &snapshot));
                    }
                    Err(err) => {
                        tracing::warn!(store = %name, error = %err, "snapshot write failed");
                    }
                }
            }
            WriteRequest::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
}

async fn write_snapshot(dir: &Path, name: &str, snapshot: &Value) -> Result<(), PersistError> {
    let path = snapshot_path(dir, name);
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, serde_json::to_vec(snapshot)?).await?;
    tokio::fs::rename(tmp, path).await?;
    Ok(())
}

impl SnapshotStore for FileSnapshots {
    fn load(&self, name: &str) -> Result<Option<Value>, PersistError> {
        if let Some(queued) = self.pending.get(name) {
            return Ok(Some(Value::clone(queued.value())));
        }
        let path = self.path_for(name);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, name: &str, snapshot: &Value) -> Result<(), PersistError> {
        self.pending.insert(name.to_string(), Arc::new(snapshot.clone()));
        self.writer
            .send(WriteRequest::Store(name.to_string()))
            .map_err(|_| PersistError::WriterStopped)
    }
}

/// Prefixes every store name with a session scope.
pub struct ScopedSnapshots {
    inner: Arc<dyn SnapshotStore>,
    scope: String,
}

impl ScopedSnapshots {
    pub fn new(inner: Arc<dyn SnapshotStore>, scope: impl Into<String>) -> Self {
        Self {
            inner,
            scope: scope.into(),
        }
    }

    fn scoped(&self, name: &str) -> String {
        format!("{}.{}", self.scope, name)
    }
}

impl SnapshotStore for ScopedSnapshots {
    fn load(&self, name: &str) -> Result<Option<Value>, PersistError> {
        self.inner.load(&self.scoped(name))
    }

    fn save(&self, name: &str, snapshot: &Value) -> Result<(), PersistError> {
        self.inner.save(&self.scoped(name), snapshot)
    }
}
