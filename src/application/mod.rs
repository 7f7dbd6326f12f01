//! Application layer - Use cases and orchestration

pub mod autosave;
pub mod background;
pub mod delete_entry;
pub mod save_entry;
pub mod search_entries;

pub use autosave::AutoSaver;
pub use background::{BackgroundStore, TaskHandle};
pub use delete_entry::delete_entry;
pub use save_entry::save_entry;
pub use search_entries::{find_entry, list_entries, search_entries};
