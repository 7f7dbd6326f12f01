//! CLI command definitions

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "diarist")]
#[command(about = "Personal diary manager", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Diary directory (overrides DIARIST_DIR and diarist.toml)
    #[arg(long, global = true, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a new entry
    New {
        /// Entry title
        #[arg(short, long)]
        title: String,

        /// Entry content (markup is stored as-is)
        #[arg(short, long, default_value = "")]
        content: String,

        /// Mood label, e.g. Happy
        #[arg(short, long)]
        mood: Option<String>,

        /// Comma-separated tags, e.g. "travel, europe"
        #[arg(long)]
        tags: Option<String>,
    },

    /// Change an existing entry
    Edit {
        /// Entry id as shown by `list`
        id: String,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        content: Option<String>,

        /// Mood label; pass an empty string to clear it
        #[arg(short, long)]
        mood: Option<String>,

        /// Comma-separated tags; pass an empty string to clear them
        #[arg(long)]
        tags: Option<String>,
    },

    /// List entries, most recently modified first
    List {
        /// Maximum number of entries to show
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Search entries by text, mood and day
    Search {
        /// Case-insensitive text to find in titles or content
        query: Option<String>,

        /// Exact mood label
        #[arg(short, long)]
        mood: Option<String>,

        /// Day the entry was last modified (YYYY-MM-DD)
        #[arg(short, long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },

    /// Print a single entry
    Show {
        id: String,
    },

    /// Delete an entry
    Delete {
        id: String,
    },
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{}', expected YYYY-MM-DD", s))
}
