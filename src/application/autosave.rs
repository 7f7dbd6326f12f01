//! Debounced auto-save
//!
//! Every edit calls [`AutoSaver::schedule`] with the latest state of the entry.
//! The save runs only after the configured idle period passes without another
//! edit; a pending save superseded by a newer edit is cancelled, never run.
//! A save that has already started always runs to completion and reports its
//! outcome.

use crate::domain::Entry;
use crate::error::{DiaryError, Result};
use crate::infrastructure::EntryStore;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

type SaveCallback = Arc<dyn Fn(Result<PathBuf>) + Send + Sync>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct AutoSaver<S> {
    store: Arc<S>,
    runtime: Handle,
    delay: Duration,
    pending: Arc<Mutex<Option<Entry>>>,
    timer: Mutex<Option<JoinHandle<()>>>,
    on_saved: Option<SaveCallback>,
}

impl<S> AutoSaver<S>
where
    S: EntryStore + Send + Sync + 'static,
{
    pub fn new(store: Arc<S>, runtime: Handle, delay: Duration) -> Self {
        AutoSaver {
            store,
            runtime,
            delay,
            pending: Arc::new(Mutex::new(None)),
            timer: Mutex::new(None),
            on_saved: None,
        }
    }

    /// Register a callback receiving the outcome of every debounced save.
    pub fn on_saved<F>(mut self, callback: F) -> Self
    where
        F: Fn(Result<PathBuf>) + Send + Sync + 'static,
    {
        self.on_saved = Some(Arc::new(callback));
        self
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Record the latest entry state and restart the idle timer.
    pub fn schedule(&self, entry: Entry) {
        *lock(&self.pending) = Some(entry);

        let mut timer = lock(&self.timer);
        if let Some(previous) = timer.take() {
            previous.abort();
            debug!("superseded pending auto-save");
        }

        let store = Arc::clone(&self.store);
        let pending = Arc::clone(&self.pending);
        let callback = self.on_saved.clone();
        let delay = self.delay;

        *timer = Some(self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;

            let entry = lock(&pending).take();
            let Some(entry) = entry else {
                return;
            };
            // Once the idle period is over the save runs on its own task, out
            // of reach of a later schedule() aborting this timer.
            tokio::spawn(async move {
                let result = save_blocking(store, entry).await;
                report(&callback, result);
            });
        }));
    }

    /// True while an edit is waiting for its idle period.
    pub fn is_pending(&self) -> bool {
        lock(&self.pending).is_some()
    }

    /// Drop the pending save, returning the entry it would have written.
    pub fn cancel(&self) -> Option<Entry> {
        if let Some(timer) = lock(&self.timer).take() {
            timer.abort();
        }
        lock(&self.pending).take()
    }

    /// Save the pending entry immediately, if there is one.
    ///
    /// The outcome is returned to the caller rather than the `on_saved` callback.
    pub async fn flush(&self) -> Result<Option<PathBuf>> {
        let Some(entry) = self.cancel() else {
            return Ok(None);
        };
        let path = save_blocking(Arc::clone(&self.store), entry).await?;
        info!(path = %path.display(), "flushed pending auto-save");
        Ok(Some(path))
    }
}

impl<S> Drop for AutoSaver<S> {
    fn drop(&mut self) {
        if let Some(timer) = lock(&self.timer).take() {
            timer.abort();
        }
    }
}

async fn save_blocking<S>(store: Arc<S>, entry: Entry) -> Result<PathBuf>
where
    S: EntryStore + Send + Sync + 'static,
{
    match tokio::task::spawn_blocking(move || store.save(&entry)).await {
        Ok(result) => result,
        Err(e) => Err(DiaryError::Background(format!("auto-save did not complete: {}", e))),
    }
}

fn report(callback: &Option<SaveCallback>, result: Result<PathBuf>) {
    match &result {
        Ok(path) => info!(path = %path.display(), "auto-saved entry"),
        Err(e) => warn!(error = %e, "auto-save failed"),
    }
    if let Some(callback) = callback {
        callback(result);
    }
}
