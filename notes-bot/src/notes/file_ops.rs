//! File operations for the note store
//!
//! Reads the data file as JSON and writes it back pretty-printed.

use serde_json::Value;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// What was found when reading the data file
#[derive(Debug, Clone, PartialEq)]
pub enum ReadOutcome {
    /// The file does not exist
    Missing,
    /// The file exists but is not valid JSON
    Corrupted,
    Parsed(Value),
}

/// Read and parse a JSON file. Only I/O errors other than "not found" are returned as `Err`.
pub fn read_json(path: &Path) -> io::Result<ReadOutcome> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(ReadOutcome::Missing),
        // Non-UTF-8 bytes can't be JSON either
        Err(e) if e.kind() == io::ErrorKind::InvalidData => return Ok(ReadOutcome::Corrupted),
        Err(e) => return Err(e),
    };

    match serde_json::from_str::<Value>(&content) {
        Ok(value) => Ok(ReadOutcome::Parsed(value)),
        Err(e) => {
            log::warn!("[NOTES] {:?} is not valid JSON: {}", path, e);
            Ok(ReadOutcome::Corrupted)
        }
    }
}

/// Write a value as 2-space indented JSON, replacing the whole file (creates parent directories as needed)
pub fn write_json_pretty(path: &Path, value: &Value) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let content = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
    let mut file = fs::File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}
