//! Search and lookup use cases

use crate::domain::{Entry, SearchCriteria};
use crate::error::{DiaryError, Result};
use crate::infrastructure::EntryStore;
use tracing::debug;

/// Load every entry and keep those matching `criteria`, newest first.
pub fn search_entries<S: EntryStore>(store: &S, criteria: &SearchCriteria) -> Result<Vec<Entry>> {
    let entries = store.load_all()?;
    let total = entries.len();
    let matches = criteria.filter(&entries);
    debug!(total, matched = matches.len(), "searched entries");
    Ok(matches)
}

/// Load every entry, newest first, keeping at most `limit`.
pub fn list_entries<S: EntryStore>(store: &S, limit: Option<usize>) -> Result<Vec<Entry>> {
    let mut entries = store.load_all()?;
    if let Some(n) = limit {
        entries.truncate(n);
    }
    Ok(entries)
}

/// Find the entry with the given id.
pub fn find_entry<S: EntryStore>(store: &S, entry_id: &str) -> Result<Entry> {
    store
        .load_all()?
        .into_iter()
        .find(|e| e.id() == entry_id)
        .ok_or_else(|| DiaryError::EntryNotFound(entry_id.to_string()))
}
