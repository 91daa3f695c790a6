use super::Storage;
use crate::error::StorageError;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

enum WriteOp {
    Write {
        key: String,
        value: Option<String>,
        seq: u64,
    },
    Flush(oneshot::Sender<()>),
}

#[derive(Debug)]
struct Shared {
    inner: Arc<dyn Storage>,
    /// Queued values not yet written, with the sequence that queued them
    pending: Mutex<HashMap<String, (u64, Option<String>)>>,
    failures: AtomicU64,
}

/// Storage that returns from `set`/`remove` before the write happens
///
/// Writes are applied in order by a blocking tokio task. Until that task
/// catches up, a crash loses the queued writes; call [`flush`](Self::flush)
/// where that window matters. Reads see queued values immediately.
#[derive(Debug)]
pub struct WriteBehindStorage {
    shared: Arc<Shared>,
    tx: mpsc::UnboundedSender<WriteOp>,
    next_seq: AtomicU64,
}

impl WriteBehindStorage {
    /// Start the background writer over `inner`
    ///
    /// Must be called from within a tokio runtime. The writer exits once this
    /// value is dropped and the queue is drained.
    #[must_use]
    pub fn spawn(inner: Arc<dyn Storage>) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::unbounded_channel::<WriteOp>();
        let shared = Arc::new(Shared {
            inner,
            pending: Mutex::new(HashMap::new()),
            failures: AtomicU64::new(0),
        });

        let worker = Arc::clone(&shared);
        let handle = tokio::task::spawn_blocking(move || {
            while let Some(op) = rx.blocking_recv() {
                match op {
                    WriteOp::Write { key, value, seq } => {
                        let result = match &value {
                            Some(v) => worker.inner.set(&key, v),
                            None => worker.inner.remove(&key),
                        };
                        if let Err(e) = result {
                            worker.failures.fetch_add(1, Ordering::Relaxed);
                            tracing::error!(key = %key, error = %e, "write-behind storage write failed");
                        }
                        let mut pending = worker.pending.lock();
                        if pending.get(&key).is_some_and(|(queued, _)| *queued == seq) {
                            pending.remove(&key);
                        }
                    }
                    WriteOp::Flush(done) => {
                        let _ = done.send(());
                    }
                }
            }
            tracing::debug!("write-behind storage writer stopped");
        });

        (
            Self {
                shared,
                tx,
                next_seq: AtomicU64::new(0),
            },
            handle,
        )
    }

    /// Wait until every write queued so far has been applied
    pub async fn flush(&self) -> Result<(), StorageError> {
        let (done_tx, done_rx) = oneshot::channel();
        self.tx
            .send(WriteOp::Flush(done_tx))
            .map_err(|_| StorageError::Closed)?;
        done_rx.await.map_err(|_| StorageError::Closed)
    }

    /// Writes queued but not yet applied
    #[must_use]
    pub fn pending_writes(&self) -> usize {
        self.shared.pending.lock().len()
    }

    /// Background writes that failed
    #[must_use]
    pub fn failed_writes(&self) -> u64 {
        self.shared.failures.load(Ordering::Relaxed)
    }

    fn enqueue(&self, key: &str, value: Option<String>) -> Result<(), StorageError> {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        self.shared
            .pending
            .lock()
            .insert(key.to_string(), (seq, value.clone()));
        self.tx
            .send(WriteOp::Write {
                key: key.to_string(),
                value,
                seq,
            })
            .map_err(|_| StorageError::Closed)
    }
}

impl Storage for WriteBehindStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if let Some((_, queued)) = self.shared.pending.lock().get(key) {
            return Ok(queued.clone());
        }
        self.shared.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.enqueue(key, Some(value.to_string()))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.enqueue(key, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[tokio::test]
    async fn flush_applies_queued_writes_in_order() {
        let inner = Arc::new(MemoryStorage::new());
        let (storage, _handle) = WriteBehindStorage::spawn(inner.clone());

        storage.set("k", "one").unwrap();
        storage.set("k", "two").unwrap();
        storage.set("gone", "x").unwrap();
        storage.remove("gone").unwrap();

        // Reads see the latest queued value before the writer catches up
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("two"));
        assert!(storage.get("gone").unwrap().is_none());

        storage.flush().await.unwrap();
        assert_eq!(inner.get("k").unwrap().as_deref(), Some("two"));
        assert!(inner.get("gone").unwrap().is_none());
        assert_eq!(storage.pending_writes(), 0);
        assert_eq!(storage.failed_writes(), 0);
    }

    #[tokio::test]
    async fn writer_stops_when_storage_dropped() {
        let inner = Arc::new(MemoryStorage::new());
        let (storage, handle) = WriteBehindStorage::spawn(inner.clone());
        storage.set("k", "v").unwrap();
        drop(storage);

        handle.await.unwrap();
        assert_eq!(inner.get("k").unwrap().as_deref(), Some("v"));
    }
}
