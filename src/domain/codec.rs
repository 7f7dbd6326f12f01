//! Flat-file record codec
//!
//! A record is a run of prefixed header lines followed by a `CONTENT:` marker
//! line and the raw content:
//!
//! ```text
//! TITLE:Trip
//! CREATED:2024-03-01T09:15:00
//! MODIFIED:2024-03-01T09:20:41.125
//! MOOD:Happy
//! TAGS:travel,europe
//! CONTENT:
//! <p>Paris</p>
//! ```
//!
//! No value is escaped. A tag containing a comma does not survive a round trip.

use crate::domain::entry::Entry;
use crate::error::{DiaryError, Result};
use chrono::NaiveDateTime;

const TITLE_PREFIX: &str = "TITLE:";
const CREATED_PREFIX: &str = "CREATED:";
const MODIFIED_PREFIX: &str = "MODIFIED:";
const MOOD_PREFIX: &str = "MOOD:";
const TAGS_PREFIX: &str = "TAGS:";
const CONTENT_MARKER: &str = "CONTENT:";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const MINUTE_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Format a timestamp for the record format, e.g. `2024-03-01T09:15:00.5`.
///
/// Fractional seconds are written only when non-zero.
pub fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a record timestamp. Minute-precision values are accepted too.
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, MINUTE_TIMESTAMP_FORMAT))
        .map_err(|e| DiaryError::MalformedRecord(format!("invalid timestamp '{}': {}", s, e)))
}

/// Encode an entry into its record text.
pub fn encode(entry: &Entry) -> String {
    let mut out = String::with_capacity(entry.content().len() + 128);
    out.push_str(TITLE_PREFIX);
    out.push_str(entry.title());
    out.push('\n');
    out.push_str(CREATED_PREFIX);
    out.push_str(&format_timestamp(entry.created()));
    out.push('\n');
    out.push_str(MODIFIED_PREFIX);
    out.push_str(&format_timestamp(entry.modified()));
    out.push('\n');
    out.push_str(MOOD_PREFIX);
    out.push_str(entry.mood().unwrap_or(""));
    out.push('\n');
    out.push_str(TAGS_PREFIX);
    out.push_str(&entry.tags().join(","));
    out.push('\n');
    out.push_str(CONTENT_MARKER);
    out.push('\n');
    out.push_str(entry.content());
    out
}

/// Decode record text into an entry.
///
/// Header lines with an unknown prefix are ignored. Everything after the
/// `CONTENT:` marker is content, kept verbatim. A record without the marker
/// decodes with empty content. Missing or unparsable `CREATED`/`MODIFIED`
/// lines are a [`DiaryError::MalformedRecord`].
pub fn decode(text: &str) -> Result<Entry> {
    let mut title = String::new();
    let mut created = None;
    let mut modified = None;
    let mut mood = None;
    let mut tags = Vec::new();
    let mut content = "";

    let mut rest = text;
    while !rest.is_empty() {
        let (raw_line, tail) = rest.split_once('\n').unwrap_or((rest, ""));
        let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);
        rest = tail;

        if line == CONTENT_MARKER {
            content = tail;
            break;
        }

        if let Some(value) = line.strip_prefix(TITLE_PREFIX) {
            title = value.to_string();
        } else if let Some(value) = line.strip_prefix(CREATED_PREFIX) {
            created = Some(parse_timestamp(value)?);
        } else if let Some(value) = line.strip_prefix(MODIFIED_PREFIX) {
            modified = Some(parse_timestamp(value)?);
        } else if let Some(value) = line.strip_prefix(MOOD_PREFIX) {
            mood = Some(value.to_string());
        } else if let Some(value) = line.strip_prefix(TAGS_PREFIX) {
            if !value.is_empty() {
                tags = value.split(',').map(str::to_string).collect();
            }
        }
    }

    let created = created
        .ok_or_else(|| DiaryError::MalformedRecord("missing CREATED line".to_string()))?;
    let modified = modified
        .ok_or_else(|| DiaryError::MalformedRecord("missing MODIFIED line".to_string()))?;

    let mut entry = Entry::created_at(title, content, created);
    entry
        .set_modified(modified)
        .map_err(|e| DiaryError::MalformedRecord(e.to_string()))?;
    entry.set_mood(mood);
    entry.set_tags(tags);
    Ok(entry)
}
