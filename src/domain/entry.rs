//! Diary entry record

use crate::domain::codec::format_timestamp;
use crate::error::{DiaryError, Result};
use chrono::{Local, NaiveDateTime};
use regex::Regex;
use std::sync::OnceLock;
use uuid::Uuid;

/// Namespace for entry identifiers derived from creation timestamps.
const ENTRY_ID_NAMESPACE: Uuid = Uuid::from_u128(0x6c1f_2e0a_93d4_4b7e_8f35_1a9c_d2e4_7b60);

fn unsafe_filename_chars() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"[^A-Za-z0-9]").unwrap())
}

fn markup_tag_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"<[^>]*>").unwrap())
}

fn tag_separator_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r",\s*").unwrap())
}

/// Current local time without timezone, the clock every entry is stamped with.
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// One diary record.
///
/// The identifier is derived from the creation timestamp, so an entry keeps
/// the same id across save and load even though the record format does not
/// store it. Two entries created within the same clock tick share an id; the
/// tick is a nanosecond on Linux but may be coarser (microseconds) elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    id: String,
    title: String,
    content: String,
    created: NaiveDateTime,
    modified: NaiveDateTime,
    tags: Vec<String>,
    mood: Option<String>,
}

impl Entry {
    /// Create a fresh entry stamped with the current time.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self::created_at(title, content, now())
    }

    /// Create an entry whose created and modified timestamps are both `created`.
    pub fn created_at(
        title: impl Into<String>,
        content: impl Into<String>,
        created: NaiveDateTime,
    ) -> Self {
        Entry {
            id: derive_id(created),
            title: title.into(),
            content: content.into(),
            created,
            modified: created,
            tags: Vec::new(),
            mood: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn created(&self) -> NaiveDateTime {
        self.created
    }

    pub fn modified(&self) -> NaiveDateTime {
        self.modified
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn mood(&self) -> Option<&str> {
        self.mood.as_deref()
    }

    /// Replace the title and bump the modified timestamp.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.touch();
    }

    /// Replace the content and bump the modified timestamp.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.touch();
    }

    pub fn set_tags(&mut self, tags: Vec<String>) {
        self.tags = tags;
    }

    /// Set the mood; an empty string clears it.
    pub fn set_mood(&mut self, mood: Option<String>) {
        self.mood = mood.filter(|m| !m.is_empty());
    }

    /// Set the modified timestamp explicitly.
    ///
    /// Fails when `modified` is earlier than the creation timestamp.
    pub fn set_modified(&mut self, modified: NaiveDateTime) -> Result<()> {
        if modified < self.created {
            return Err(DiaryError::Validation(format!(
                "modified time {} is before created time {}",
                format_timestamp(modified),
                format_timestamp(self.created)
            )));
        }
        self.modified = modified;
        Ok(())
    }

    /// Stamp the entry as modified now.
    pub fn touch(&mut self) {
        self.modified = now().max(self.created);
    }

    /// Check the fields a save requires.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(DiaryError::Validation(
                "entry title must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Modified date as `yyyy-MM-dd`.
    pub fn date_only(&self) -> String {
        self.modified.format("%Y-%m-%d").to_string()
    }

    /// Modified timestamp for display, e.g. `Mar 01, 2024 09:30`.
    pub fn formatted_date(&self) -> String {
        self.modified.format("%b %d, %Y %H:%M").to_string()
    }

    /// Name of the backing file: `<date>_<sanitized-title><extension>`.
    pub fn file_name(&self, extension: &str) -> String {
        format!(
            "{}_{}{}",
            self.date_only(),
            sanitize_title(&self.title),
            extension
        )
    }

    /// Plain-text preview of the content with markup removed.
    pub fn preview(&self, max_len: usize) -> String {
        let plain = markup_tag_regex().replace_all(&self.content, "");
        if plain.chars().count() <= max_len {
            return plain.into_owned();
        }
        let truncated: String = plain.chars().take(max_len).collect();
        format!("{}...", truncated)
    }
}

/// Replace every character outside `[A-Za-z0-9]` with `_`.
pub fn sanitize_title(title: &str) -> String {
    unsafe_filename_chars().replace_all(title, "_").into_owned()
}

/// Split user tag input such as `"travel, europe"` into tags.
pub fn parse_tag_input(input: &str) -> Vec<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    tag_separator_regex()
        .split(trimmed)
        .map(|tag| tag.to_string())
        .collect()
}

fn derive_id(created: NaiveDateTime) -> String {
    Uuid::new_v5(&ENTRY_ID_NAMESPACE, format_timestamp(created).as_bytes()).to_string()
}
