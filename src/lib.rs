//! diarist - Personal diary manager
//!
//! Diary entries live as one flat text file each in a storage directory.
//! The crate provides the record codec, the directory-backed store, in-memory
//! search, and background and debounced-save helpers for interactive front ends.

pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use error::DiaryError;
