//! Single writer task that applies persisted snapshots in order.
//!
//! Store mutations are synchronous and must never wait on I/O, so they hand
//! their serialized snapshot to an unbounded channel and return. One task
//! drains the channel and writes to the [`KeyValueStore`], which keeps writes
//! for the same key in mutation order.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use super::{KeyValueStore, PersistError, encode};

enum Command {
    Put { key: String, value: Vec<u8> },
    Remove { key: String },
    Flush(oneshot::Sender<()>),
}

/// Handle for enqueueing writes. Cheap to clone.
#[derive(Debug, Clone)]
pub struct PersistQueue {
    tx: mpsc::UnboundedSender<Command>,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Put { key, value } => f
                .debug_struct("Put")
                .field("key", key)
                .field("bytes", &value.len())
                .finish(),
            Self::Remove { key } => f.debug_struct("Remove").field("key", key).finish(),
            Self::Flush(_) => f.write_str("Flush"),
        }
    }
}

impl PersistQueue {
    /// Spawn the writer task on the current Tokio runtime.
    ///
    /// The task exits once every `PersistQueue` clone has been dropped and the
    /// remaining commands are applied.
    #[must_use]
    pub fn spawn(store: Arc<dyn KeyValueStore>) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run(store, rx));
        (Self { tx }, handle)
    }

    /// Serialize `data` and enqueue it under `key`.
    ///
    /// Encoding or enqueue failures are logged and otherwise ignored.
    pub fn save<T: Serialize>(&self, key: &str, data: &T) {
        match encode(data) {
            Ok(value) => self.send(Command::Put {
                key: key.to_owned(),
                value,
            }),
            Err(e) => tracing::warn!(key, error = %e, "Failed to encode state for persistence"),
        }
    }

    /// Enqueue removal of `key`.
    pub fn remove(&self, key: &str) {
        self.send(Command::Remove {
            key: key.to_owned(),
        });
    }

    /// Wait until every command enqueued before this call has been applied.
    ///
    /// # Errors
    ///
    /// Returns `PersistError::QueueClosed` if the writer task has stopped.
    pub async fn flush(&self) -> Result<(), PersistError> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.tx
            .send(Command::Flush(ack_tx))
            .map_err(|_| PersistError::QueueClosed)?;
        ack_rx.await.map_err(|_| PersistError::QueueClosed)
    }

    fn send(&self, command: Command) {
        if let Err(e) = self.tx.send(command) {
            tracing::warn!(command = ?e.0, "Persist queue closed, dropping write");
        }
    }
}

async fn run(store: Arc<dyn KeyValueStore>, mut rx: mpsc::UnboundedReceiver<Command>) {
    while let Some(command) = rx.recv().await {
        match command {
            Command::Put { key, value } => {
                if let Err(e) = store.put(&key, value).await {
                    tracing::warn!(key, error = %e, "Failed to persist state");
                }
            }
            Command::Remove { key } => {
                if let Err(e) = store.remove(&key).await {
                    tracing::warn!(key, error = %e, "Failed to remove persisted state");
                }
            }
            Command::Flush(ack) => {
                let _ = ack.send(());
            }
        }
    }
    tracing::debug!("Persist queue drained");
}

/// A persisted blob: its key plus the queue that writes it.
#[derive(Debug, Clone)]
pub struct PersistTarget {
    key: String,
    queue: PersistQueue,
}

impl PersistTarget {
    /// Bind a key to a queue.
    #[must_use]
    pub const fn new(key: String, queue: PersistQueue) -> Self {
        Self { key, queue }
    }

    /// The storage key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Enqueue a snapshot of `data`.
    pub fn save<T: Serialize>(&self, data: &T) {
        self.queue.save(&self.key, data);
    }
}
