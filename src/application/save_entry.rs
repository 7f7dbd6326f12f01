//! Save entry use case

use crate::domain::Entry;
use crate::error::Result;
use crate::infrastructure::EntryStore;
use std::path::PathBuf;
use tracing::info;

/// Validate, normalise and persist an entry edited by the user.
///
/// A blank title is rejected before anything is written. The title is trimmed
/// and the modified timestamp stamped to now, so the file name follows the
/// day of the edit.
pub fn save_entry<S: EntryStore>(store: &S, entry: &mut Entry) -> Result<PathBuf> {
    entry.validate()?;

    let trimmed = entry.title().trim();
    if trimmed != entry.title() {
        let trimmed = trimmed.to_string();
        entry.set_title(trimmed);
    }
    entry.touch();

    let path = store.save(entry)?;
    info!(id = entry.id(), path = %path.display(), "saved entry");
    Ok(path)
}
