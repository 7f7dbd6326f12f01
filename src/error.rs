//! Error types for diarist

use thiserror::Error;

/// Main error type for diarist
#[derive(Debug, Error)]
pub enum DiaryError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Entry not found: {0}")]
    EntryNotFound(String),

    #[error("Background task failed: {0}")]
    Background(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),
}

impl DiaryError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            DiaryError::Configuration(_) => 2,
            DiaryError::Validation(_) => 3,
            DiaryError::EntryNotFound(_) => 4,
            _ => 1,
        }
    }

    /// Get a user-friendly error message with suggestions
    pub fn display_with_suggestions(&self) -> String {
        match self {
            DiaryError::Configuration(msg) => {
                format!(
                    "{}\n\n\
                    Suggestions:\n\
                    • Check that the storage directory is writable\n\
                    • Pass a different directory with --dir\n\
                    • Set DIARIST_DIR environment variable to your diary path",
                    msg
                )
            }
            DiaryError::Validation(msg) => {
                format!(
                    "{}\n\n\
                    Every entry needs a non-empty title.\n\
                    Example: diarist new --title \"Morning Walk\"",
                    msg
                )
            }
            DiaryError::EntryNotFound(id) => {
                format!(
                    "No entry with id '{}'\n\n\
                    Suggestions:\n\
                    • Use 'diarist list' to see entry ids\n\
                    • Entries renamed on disk by hand may no longer match",
                    id
                )
            }
            _ => self.to_string(),
        }
    }
}

/// Result type using DiaryError
pub type Result<T> = std::result::Result<T, DiaryError>;
