//! Directory-backed entry store
//!
//! One file per entry, named `<yyyy-MM-dd>_<sanitized-title><extension>` from
//! the entry's modified date and title. There is no index: the set of entries
//! is every file in the directory with the configured extension.
//!
//! Because the name is derived from date and title rather than the id,
//! saving an entry after its title or modified date changed writes a new file
//! and leaves the previous one in place.
//!
//! Operations are independent and unsynchronised. Concurrent callers against
//! the same directory race at the filesystem level: the last write wins and a
//! load running alongside a delete may or may not see the deleted file.

use crate::domain::{codec, Entry};
use crate::error::{DiaryError, Result};
use crate::infrastructure::Config;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Durable collection of diary entries
pub trait EntryStore {
    /// Directory holding the entry files
    fn root(&self) -> &Path;

    /// Write an entry, replacing any file with the same computed name.
    /// Returns the path written.
    fn save(&self, entry: &Entry) -> Result<PathBuf>;

    /// Load every entry, most recently modified first.
    fn load_all(&self) -> Result<Vec<Entry>>;

    /// Delete the entry with the given id. Returns false when no entry has
    /// that id or its computed file does not exist.
    fn delete(&self, entry_id: &str) -> Result<bool>;
}

/// File system implementation of EntryStore
#[derive(Debug, Clone)]
pub struct FileSystemStore {
    root: PathBuf,
    extension: String,
}

impl FileSystemStore {
    /// Open the store described by `config`, creating its directory (and
    /// parents) when absent.
    pub fn open(config: &Config) -> Result<Self> {
        let root = config.storage_dir.clone();

        if !root.is_dir() {
            fs::create_dir_all(&root).map_err(|e| {
                DiaryError::Configuration(format!(
                    "Failed to create diary directory {}: {}",
                    root.display(),
                    e
                ))
            })?;
            info!(path = %root.display(), "created diary directory");
        }

        Ok(FileSystemStore {
            root,
            extension: config.extension.clone(),
        })
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Path the entry is stored at
    pub fn path_for(&self, entry: &Entry) -> PathBuf {
        self.root.join(entry.file_name(&self.extension))
    }

    /// Read and decode a single entry file.
    ///
    /// Content that is not valid UTF-8 is a [`DiaryError::MalformedRecord`];
    /// failures to read the file at all stay [`DiaryError::Io`].
    pub fn load_file(&self, path: &Path) -> Result<Entry> {
        let bytes = fs::read(path)?;
        let text = String::from_utf8(bytes)
            .map_err(|e| DiaryError::MalformedRecord(format!("not UTF-8 text: {}", e)))?;
        codec::decode(&text)
    }

    /// Entry files in the directory, ordered by file name. Symlinks to files
    /// count as entry files.
    fn entry_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry.map_err(|e| match e.into_io_error() {
                Some(io) => DiaryError::Io(io),
                None => DiaryError::Io(std::io::Error::other("directory walk failed")),
            })?;
            if !entry.path().is_file() {
                continue;
            }
            let matches_extension = entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.ends_with(&self.extension));
            if matches_extension {
                files.push(entry.into_path());
            }
        }

        Ok(files)
    }
}

impl EntryStore for FileSystemStore {
    fn root(&self) -> &Path {
        &self.root
    }

    fn save(&self, entry: &Entry) -> Result<PathBuf> {
        entry.validate()?;

        let path = self.path_for(entry);
        fs::write(&path, codec::encode(entry))?;

        debug!(id = entry.id(), path = %path.display(), "saved entry");
        Ok(path)
    }

    fn load_all(&self) -> Result<Vec<Entry>> {
        let mut entries = Vec::new();

        for path in self.entry_files()? {
            match self.load_file(&path) {
                Ok(entry) => entries.push(entry),
                Err(e) if skipped_on_load(&e) => {
                    warn!(path = %path.display(), error = %e, "skipping malformed entry file");
                }
                Err(e) => return Err(e),
            }
        }

        // Stable sort keeps enumeration order for equal timestamps
        entries.sort_by(|a, b| b.modified().cmp(&a.modified()));

        debug!(count = entries.len(), "loaded entries");
        Ok(entries)
    }

    fn delete(&self, entry_id: &str) -> Result<bool> {
        let entries = self.load_all()?;

        let Some(entry) = entries.iter().find(|e| e.id() == entry_id) else {
            debug!(id = entry_id, "no entry with id");
            return Ok(false);
        };

        let path = self.path_for(entry);
        if !path.is_file() {
            debug!(id = entry_id, path = %path.display(), "computed entry file missing");
            return Ok(false);
        }

        fs::remove_file(&path)?;
        info!(id = entry_id, path = %path.display(), "deleted entry");
        Ok(true)
    }
}

/// Only a record that fails to decode is skipped during a bulk load; every
/// other failure aborts it.
fn skipped_on_load(err: &DiaryError) -> bool {
    matches!(err, DiaryError::MalformedRecord(_))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use tempfile::TempDir;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn store_in(temp: &TempDir) -> FileSystemStore {
        FileSystemStore::open(&Config::with_storage_dir(temp.path().join("entries"))).unwrap()
    }

    fn entry(title: &str, created: NaiveDateTime, modified: NaiveDateTime) -> Entry {
        let mut e = Entry::created_at(title, "", created);
        e.set_modified(modified).unwrap();
        e
    }

    #[test]
    fn test_open_creates_nested_directory() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("a").join("b").join("entries");
        let store = FileSystemStore::open(&Config::with_storage_dir(&dir)).unwrap();

        assert!(dir.is_dir());
        assert_eq!(store.root(), dir);
        assert_eq!(store.extension(), ".diary");
    }

    #[test]
    fn test_open_existing_directory() {
        let temp = TempDir::new().unwrap();
        let store = FileSystemStore::open(&Config::with_storage_dir(temp.path())).unwrap();
        assert_eq!(store.root(), temp.path());
    }

    #[test]
    fn test_open_fails_when_path_is_a_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("occupied");
        fs::write(&file, "x").unwrap();

        let result = FileSystemStore::open(&Config::with_storage_dir(&file));
        assert!(matches!(result, Err(DiaryError::Configuration(_))));
    }

    #[test]
    fn test_save_writes_named_file() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);

        let mut e = Entry::created_at("Trip", "<p>Paris</p>", at(2024, 3, 1, 9, 0));
        e.set_mood(Some("Happy".to_string()));
        e.set_tags(vec!["travel".to_string(), "europe".to_string()]);

        let path = store.save(&e).unwrap();
        assert_eq!(path, store.root().join("2024-03-01_Trip.diary"));

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], "TITLE:Trip");
        assert!(lines[1].starts_with("CREATED:"));
        assert!(lines[2].starts_with("MODIFIED:"));
        assert_eq!(lines[3], "MOOD:Happy");
        assert_eq!(lines[4], "TAGS:travel,europe");
        assert_eq!(lines[5], "CONTENT:");
        assert_eq!(lines[6], "<p>Paris</p>");
    }

    #[test]
    fn test_save_overwrites_same_name() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);

        let mut e = Entry::created_at("Trip", "first", at(2024, 3, 1, 9, 0));
        store.save(&e).unwrap();
        e.set_content("second");
        e.set_modified(at(2024, 3, 1, 10, 0)).unwrap();
        store.save(&e).unwrap();

        let all = store.load_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].content(), "second");
    }

    #[test]
    fn test_save_rejects_empty_title_without_io() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);

        let result = store.save(&Entry::created_at("  ", "body", at(2024, 3, 1, 9, 0)));
        assert!(matches!(result, Err(DiaryError::Validation(_))));
        assert_eq!(fs::read_dir(store.root()).unwrap().count(), 0);
    }

    #[test]
    fn test_title_change_leaves_old_file() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);

        let mut e = Entry::created_at("Draft", "", at(2024, 3, 1, 9, 0));
        store.save(&e).unwrap();
        e.set_title("Final");
        e.set_modified(at(2024, 3, 1, 9, 30)).unwrap();
        store.save(&e).unwrap();

        assert!(store.root().join("2024-03-01_Draft.diary").exists());
        assert!(store.root().join("2024-03-01_Final.diary").exists());
        assert_eq!(store.load_all().unwrap().len(), 2);
    }

    #[test]
    fn test_load_all_empty() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_load_all_sorted_by_modified_descending() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);

        let base = at(2024, 3, 1, 8, 0);
        store.save(&entry("A", base, at(2024, 3, 1, 9, 0))).unwrap();
        store
            .save(&entry("B", at(2024, 3, 1, 8, 1), at(2024, 3, 1, 11, 0)))
            .unwrap();
        store
            .save(&entry("C", at(2024, 3, 1, 8, 2), at(2024, 3, 1, 10, 0)))
            .unwrap();

        let titles: Vec<String> = store
            .load_all()
            .unwrap()
            .iter()
            .map(|e| e.title().to_string())
            .collect();
        assert_eq!(titles, vec!["B", "C", "A"]);
    }

    #[test]
    fn test_load_all_ignores_other_files() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);

        store.save(&entry("A", at(2024, 3, 1, 8, 0), at(2024, 3, 1, 8, 0))).unwrap();
        fs::write(store.root().join("notes.txt"), "not an entry").unwrap();
        fs::create_dir(store.root().join("nested.diary")).unwrap();

        assert_eq!(store.load_all().unwrap().len(), 1);
    }

    #[test]
    fn test_load_all_skips_corrupt_file() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);

        store.save(&entry("Good", at(2024, 3, 1, 8, 0), at(2024, 3, 1, 8, 0))).unwrap();
        fs::write(
            store.root().join("2024-03-01_Bad.diary"),
            "TITLE:Bad\nMODIFIED:2024-03-01T09:00:00\nCONTENT:\nbody",
        )
        .unwrap();

        let all = store.load_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].title(), "Good");
    }

    #[test]
    fn test_load_all_reads_files_written_elsewhere() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);

        fs::write(
            store.root().join("2024-03-01_Old.diary"),
            "TITLE:Old\nCREATED:2024-03-01T09:00\nMODIFIED:2024-03-01T09:05:30.25\nMOOD:\nTAGS:\nCONTENT:\n<p>a</p>\n<p>b</p>",
        )
        .unwrap();

        let all = store.load_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].content(), "<p>a</p>\n<p>b</p>");
        assert_eq!(all[0].mood(), None);
    }

    #[test]
    fn test_delete_removes_file() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);

        let keep = entry("Keep", at(2024, 3, 1, 8, 0), at(2024, 3, 1, 8, 0));
        let gone = entry("Gone", at(2024, 3, 1, 9, 0), at(2024, 3, 1, 9, 0));
        store.save(&keep).unwrap();
        store.save(&gone).unwrap();

        assert!(store.delete(gone.id()).unwrap());
        assert!(!store.root().join("2024-03-01_Gone.diary").exists());

        let ids: Vec<String> = store
            .load_all()
            .unwrap()
            .iter()
            .map(|e| e.id().to_string())
            .collect();
        assert_eq!(ids, vec![keep.id().to_string()]);
    }

    #[test]
    fn test_delete_unknown_id() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);

        store.save(&entry("A", at(2024, 3, 1, 8, 0), at(2024, 3, 1, 8, 0))).unwrap();
        assert!(!store.delete("no-such-id").unwrap());
        assert_eq!(store.load_all().unwrap().len(), 1);
    }

    #[test]
    fn test_delete_reports_missing_when_file_name_drifted() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);

        let e = entry("Trip", at(2024, 3, 1, 8, 0), at(2024, 3, 1, 8, 0));
        store.save(&e).unwrap();
        fs::rename(
            store.root().join("2024-03-01_Trip.diary"),
            store.root().join("renamed.diary"),
        )
        .unwrap();

        assert!(!store.delete(e.id()).unwrap());
        assert!(store.root().join("renamed.diary").exists());
    }

    #[test]
    fn test_custom_extension() {
        let temp = TempDir::new().unwrap();
        let config = Config {
            extension: ".entry".to_string(),
            ..Config::with_storage_dir(temp.path())
        };
        let store = FileSystemStore::open(&config).unwrap();

        let path = store
            .save(&entry("X", at(2024, 3, 1, 8, 0), at(2024, 3, 1, 8, 0)))
            .unwrap();
        assert_eq!(path.file_name().unwrap(), "2024-03-01_X.entry");
        fs::write(temp.path().join("2024-03-01_Y.diary"), "ignored").unwrap();
        assert_eq!(store.load_all().unwrap().len(), 1);
    }

    #[test]
    fn test_equal_modified_keeps_file_name_order() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);

        let modified = at(2024, 3, 1, 12, 0);
        store.save(&entry("B", at(2024, 3, 1, 8, 0), modified)).unwrap();
        store.save(&entry("A", at(2024, 3, 1, 9, 0), modified)).unwrap();

        let titles: Vec<String> = store
            .load_all()
            .unwrap()
            .iter()
            .map(|e| e.title().to_string())
            .collect();
        assert_eq!(titles, vec!["A", "B"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_load_all_follows_symlinked_entry() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);

        let outside = temp.path().join("elsewhere.txt");
        fs::write(
            &outside,
            codec::encode(&entry("Linked", at(2024, 3, 1, 8, 0), at(2024, 3, 1, 8, 0))),
        )
        .unwrap();
        std::os::unix::fs::symlink(&outside, store.root().join("2024-03-01_Linked.diary"))
            .unwrap();
        std::os::unix::fs::symlink(
            temp.path().join("missing"),
            store.root().join("2024-03-01_Dangling.diary"),
        )
        .unwrap();

        let all = store.load_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].title(), "Linked");
    }

    #[test]
    fn test_load_all_skips_non_utf8_file() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);

        store.save(&entry("Good", at(2024, 3, 1, 8, 0), at(2024, 3, 1, 8, 0))).unwrap();
        fs::write(store.root().join("binary.diary"), [0xff, 0xfe, 0x00, 0x9f]).unwrap();

        let all = store.load_all().unwrap();
        assert_eq!(all.len(), 1);
        assert!(matches!(
            store.load_file(&store.root().join("binary.diary")),
            Err(DiaryError::MalformedRecord(_))
        ));
    }

    #[test]
    fn test_only_malformed_records_are_skipped() {
        assert!(skipped_on_load(&DiaryError::MalformedRecord("x".to_string())));
        assert!(!skipped_on_load(&DiaryError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied"
        ))));
    }

    #[cfg(unix)]
    #[test]
    fn test_load_all_surfaces_read_failure() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);

        store.save(&entry("Locked", at(2024, 3, 1, 8, 0), at(2024, 3, 1, 8, 0))).unwrap();
        let path = store.root().join("2024-03-01_Locked.diary");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users read the file regardless of its mode
        if fs::read(&path).is_ok() {
            return;
        }

        let result = store.load_all();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();
        assert!(matches!(result, Err(DiaryError::Io(_))));
    }
}
