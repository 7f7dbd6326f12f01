//! Delete entry use case

use crate::error::{DiaryError, Result};
use crate::infrastructure::EntryStore;
use tracing::info;

/// Delete the entry with `entry_id`, failing with
/// [`DiaryError::EntryNotFound`] when nothing was removed.
pub fn delete_entry<S: EntryStore>(store: &S, entry_id: &str) -> Result<()> {
    if store.delete(entry_id)? {
        info!(id = entry_id, "entry deleted");
        Ok(())
    } else {
        Err(DiaryError::EntryNotFound(entry_id.to_string()))
    }
}
