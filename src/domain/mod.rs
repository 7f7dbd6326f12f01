//! Domain layer - Diary entries, record format and search

pub mod codec;
pub mod entry;
pub mod search;

pub use entry::{parse_tag_input, sanitize_title, Entry};
pub use search::SearchCriteria;
