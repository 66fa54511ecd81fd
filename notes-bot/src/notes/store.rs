//! NoteStore — append-only JSON file of saved notes
//!
//! The whole collection lives in one JSON array on disk. Every operation
//! reads the file from scratch; nothing is cached between commands.

use super::entry::{Entry, StoredRecord};
use super::file_ops::{self, ReadOutcome};
use parking_lot::Mutex;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Result of reading the store for display
#[derive(Debug, Clone, PartialEq)]
pub enum StoreContents {
    /// The data file does not exist yet
    Missing,
    /// The data file could not be parsed as JSON
    Corrupted,
    Entries(Vec<Entry>),
}

/// Flat-file note store
pub struct NoteStore {
    data_file: PathBuf,
    /// Serializes read-modify-write cycles; gateway events are handled concurrently
    lock: Mutex<()>,
}

impl NoteStore {
    pub fn new(data_file: impl Into<PathBuf>) -> Self {
        Self {
            data_file: data_file.into(),
            lock: Mutex::new(()),
        }
    }

    /// Get the data file path
    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    /// File name shown to users in replies
    pub fn display_name(&self) -> String {
        self.data_file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.data_file.to_string_lossy().to_string())
    }

    /// Read the store, telling apart a missing file and a corrupted one
    pub fn read(&self) -> Result<StoreContents, String> {
        let _guard = self.lock.lock();
        let outcome = file_ops::read_json(&self.data_file)
            .map_err(|e| format!("Failed to read {:?}: {}", self.data_file, e))?;

        Ok(match outcome {
            ReadOutcome::Missing => StoreContents::Missing,
            ReadOutcome::Corrupted => StoreContents::Corrupted,
            ReadOutcome::Parsed(value) => StoreContents::Entries(
                StoredRecord::collection_from(value)
                    .into_iter()
                    .map(StoredRecord::into_entry)
                    .collect(),
            ),
        })
    }

    /// Load all entries. A missing or corrupted file yields an empty list.
    pub fn load(&self) -> Result<Vec<Entry>, String> {
        match self.read()? {
            StoreContents::Entries(entries) => Ok(entries),
            StoreContents::Missing | StoreContents::Corrupted => Ok(Vec::new()),
        }
    }

    /// Append an entry, rewriting the whole file.
    ///
    /// Existing records are written back exactly as they were read. A
    /// corrupted file is replaced by a fresh list holding only the new entry.
    pub fn append(&self, entry: &Entry) -> Result<usize, String> {
        let _guard = self.lock.lock();

        let mut records = match file_ops::read_json(&self.data_file)
            .map_err(|e| format!("Failed to read {:?}: {}", self.data_file, e))?
        {
            ReadOutcome::Parsed(value) => StoredRecord::collection_from(value),
            ReadOutcome::Missing => Vec::new(),
            ReadOutcome::Corrupted => {
                log::warn!(
                    "[NOTES] {:?} is corrupted, starting a fresh collection",
                    self.data_file
                );
                Vec::new()
            }
        };
        records.push(StoredRecord::from(entry.to_value()?));

        let count = records.len();
        let array = Value::Array(records.into_iter().map(StoredRecord::into_value).collect());
        file_ops::write_json_pretty(&self.data_file, &array)
            .map_err(|e| format!("Failed to write {:?}: {}", self.data_file, e))?;

        log::info!(
            "[NOTES] Saved note from {} ({} entries in {:?})",
            entry.author,
            count,
            self.data_file
        );
        Ok(count)
    }
}
