//! Infrastructure layer - External I/O and persistence

pub mod config;
pub mod store;

pub use config::Config;
pub use store::{EntryStore, FileSystemStore};
