//! Store operations off the caller's thread
//!
//! Each call runs one blocking store operation on the runtime's blocking pool
//! and hands back a [`TaskHandle`] that yields the outcome exactly once. The
//! operation cannot be interrupted once started. The store itself is not
//! synchronised, so callers should keep one operation in flight per store.

use crate::domain::Entry;
use crate::error::{DiaryError, Result};
use crate::infrastructure::EntryStore;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Runs [`EntryStore`] operations on a tokio blocking pool.
pub struct BackgroundStore<S> {
    store: Arc<S>,
    runtime: Handle,
}

impl<S> Clone for BackgroundStore<S> {
    fn clone(&self) -> Self {
        BackgroundStore {
            store: Arc::clone(&self.store),
            runtime: self.runtime.clone(),
        }
    }
}

impl<S> BackgroundStore<S>
where
    S: EntryStore + Send + Sync + 'static,
{
    pub fn new(store: S, runtime: Handle) -> Self {
        Self::from_shared(Arc::new(store), runtime)
    }

    pub fn from_shared(store: Arc<S>, runtime: Handle) -> Self {
        BackgroundStore { store, runtime }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn save(&self, entry: Entry) -> TaskHandle<PathBuf> {
        let store = Arc::clone(&self.store);
        self.spawn("save", move || store.save(&entry))
    }

    pub fn load_all(&self) -> TaskHandle<Vec<Entry>> {
        let store = Arc::clone(&self.store);
        self.spawn("load_all", move || store.load_all())
    }

    pub fn delete(&self, entry_id: impl Into<String>) -> TaskHandle<bool> {
        let store = Arc::clone(&self.store);
        let entry_id = entry_id.into();
        self.spawn("delete", move || store.delete(&entry_id))
    }

    fn spawn<T, F>(&self, operation: &'static str, f: F) -> TaskHandle<T>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T> + Send + 'static,
    {
        debug!(operation, "starting background store operation");
        TaskHandle {
            operation,
            runtime: self.runtime.clone(),
            inner: self.runtime.spawn_blocking(f),
        }
    }
}

/// Pending outcome of a background store operation
pub struct TaskHandle<T> {
    operation: &'static str,
    runtime: Handle,
    inner: JoinHandle<Result<T>>,
}

impl<T> TaskHandle<T>
where
    T: Send + 'static,
{
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    pub fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }

    /// Wait for the operation to finish.
    pub async fn wait(self) -> Result<T> {
        let operation = self.operation;
        let result = match self.inner.await {
            Ok(result) => result,
            Err(e) => Err(DiaryError::Background(format!(
                "{} did not complete: {}",
                operation, e
            ))),
        };

        if let Err(e) = &result {
            warn!(operation, error = %e, "background store operation failed");
        }
        result
    }

    /// Invoke `callback` once with the outcome when the operation finishes.
    pub fn on_complete<F>(self, callback: F) -> JoinHandle<()>
    where
        F: FnOnce(Result<T>) + Send + 'static,
    {
        let runtime = self.runtime.clone();
        runtime.spawn(async move { callback(self.wait().await) })
    }

    /// Split the outcome into separate success and failure callbacks.
    pub fn on_outcome<OnOk, OnErr>(self, on_success: OnOk, on_failure: OnErr) -> JoinHandle<()>
    where
        OnOk: FnOnce(T) + Send + 'static,
        OnErr: FnOnce(DiaryError) + Send + 'static,
    {
        self.on_complete(move |result| match result {
            Ok(value) => on_success(value),
            Err(e) => on_failure(e),
        })
    }
}
