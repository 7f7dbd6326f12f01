//! In-memory entry search

use crate::domain::entry::Entry;
use chrono::NaiveDate;

/// Optional search criteria, combined with logical AND.
///
/// An omitted criterion imposes no constraint, so the default value matches
/// every entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    /// Case-insensitive substring of the title or the content.
    pub query: Option<String>,
    /// Exact mood label.
    pub mood: Option<String>,
    /// Calendar day of the modified timestamp.
    pub date: Option<NaiveDate>,
}

impl SearchCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_mood(mut self, mood: impl Into<String>) -> Self {
        self.mood = Some(mood.into());
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// True when no criterion constrains the result.
    pub fn is_empty(&self) -> bool {
        self.active_query().is_none() && self.active_mood().is_none() && self.date.is_none()
    }

    fn active_query(&self) -> Option<&str> {
        self.query.as_deref().filter(|q| !q.is_empty())
    }

    fn active_mood(&self) -> Option<&str> {
        self.mood.as_deref().filter(|m| !m.is_empty())
    }

    /// Check a single entry against every supplied criterion.
    pub fn matches(&self, entry: &Entry) -> bool {
        if let Some(query) = self.active_query() {
            let needle = query.to_lowercase();
            let in_title = entry.title().to_lowercase().contains(&needle);
            if !in_title && !entry.content().to_lowercase().contains(&needle) {
                return false;
            }
        }

        if let Some(mood) = self.active_mood() {
            if entry.mood() != Some(mood) {
                return false;
            }
        }

        if let Some(date) = self.date {
            if entry.modified().date() != date {
                return false;
            }
        }

        true
    }

    /// Entries matching the criteria, in input order.
    pub fn filter(&self, entries: &[Entry]) -> Vec<Entry> {
        if self.is_empty() {
            return entries.to_vec();
        }
        entries
            .iter()
            .filter(|entry| self.matches(entry))
            .cloned()
            .collect()
    }
}

/// Filter entries by optional query, mood and modified date.
pub fn filter(
    entries: &[Entry],
    query: Option<&str>,
    mood: Option<&str>,
    date: Option<NaiveDate>,
) -> Vec<Entry> {
    SearchCriteria {
        query: query.map(str::to_string),
        mood: mood.map(str::to_string),
        date,
    }
    .filter(entries)
}
