//! Output formatting utilities

use crate::domain::Entry;

const PREVIEW_LENGTH: usize = 60;

/// Format a list of entries for display
pub fn format_entry_list(entries: &[Entry]) -> String {
    if entries.is_empty() {
        return "No entries found".to_string();
    }

    let mut output = String::new();
    for entry in entries {
        output.push_str(&format!(
            "{}  {}  {}",
            entry.id(),
            entry.formatted_date(),
            entry.title()
        ));
        if let Some(mood) = entry.mood() {
            output.push_str(&format!(" [{}]", mood));
        }
        output.push('\n');

        let preview = entry.preview(PREVIEW_LENGTH);
        if !preview.trim().is_empty() {
            output.push_str(&format!("    {}\n", preview.replace('\n', " ")));
        }
    }
    output
}

/// Format one entry with all of its fields
pub fn format_entry_detail(entry: &Entry) -> String {
    let mut output = String::new();
    output.push_str(&format!("Title:    {}\n", entry.title()));
    output.push_str(&format!("Id:       {}\n", entry.id()));
    output.push_str(&format!(
        "Created:  {}\n",
        entry.created().format("%b %d, %Y %H:%M")
    ));
    output.push_str(&format!("Modified: {}\n", entry.formatted_date()));
    if let Some(mood) = entry.mood() {
        output.push_str(&format!("Mood:     {}\n", mood));
    }
    if !entry.tags().is_empty() {
        output.push_str(&format!("Tags:     {}\n", entry.tags().join(", ")));
    }
    output.push('\n');
    output.push_str(entry.content());
    if !entry.content().ends_with('\n') {
        output.push('\n');
    }
    output
}
