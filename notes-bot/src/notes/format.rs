//! Rendering saved notes as chat text
//!
//! Groups entries per author, localizes timestamps and splits the result
//! into message-sized chunks.

use super::entry::Entry;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::Formatter;
use std::collections::HashMap;
use std::io;

/// Default chunk size; Discord caps messages at 2000 characters
pub const DEFAULT_MAX_CHUNK: usize = 1900;

const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S %Z";

/// Timezone timestamps are shown in
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DisplayZone {
    Named(Tz),
    /// Process-local zone whose IANA name could not be determined
    Local,
}

impl DisplayZone {
    /// Resolve an IANA timezone name like `Europe/Berlin`
    pub fn from_name(name: &str) -> Option<Self> {
        name.parse::<Tz>().ok().map(DisplayZone::Named)
    }

    /// The process-local zone, by name when the OS reports one
    pub fn local() -> Self {
        match iana_time_zone::get_timezone() {
            Ok(name) => Self::from_name(&name).unwrap_or(DisplayZone::Local),
            Err(e) => {
                log::debug!("[NOTES] Could not determine local timezone name: {}", e);
                DisplayZone::Local
            }
        }
    }

    fn format(&self, instant: &DateTime<FixedOffset>) -> String {
        match self {
            DisplayZone::Named(tz) => instant.with_timezone(tz).format(DISPLAY_FORMAT).to_string(),
            DisplayZone::Local => instant
                .with_timezone(&chrono::Local)
                .format(DISPLAY_FORMAT)
                .to_string(),
        }
    }
}

/// Entries grouped by author, in first-seen order
#[derive(Debug, Default)]
pub struct AuthorGroups {
    groups: Vec<(String, Vec<Entry>)>,
}

impl AuthorGroups {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Entry])> {
        self.groups.iter().map(|(a, e)| (a.as_str(), e.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of entries across all authors
    pub fn entry_count(&self) -> usize {
        self.groups.iter().map(|(_, e)| e.len()).sum()
    }
}

/// Group entries by author in a single pass, keeping insertion order
pub fn group_by_author(entries: Vec<Entry>) -> AuthorGroups {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<Entry>)> = Vec::new();

    for entry in entries {
        match index.get(&entry.author).copied() {
            Some(i) => groups[i].1.push(entry),
            None => {
                index.insert(entry.author.clone(), groups.len());
                groups.push((entry.author.clone(), vec![entry]));
            }
        }
    }

    AuthorGroups { groups }
}

/// Parse an ISO-8601 timestamp. Values without an offset are taken as UTC.
fn parse_iso(raw: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt);
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%:z"] {
        if let Ok(dt) = DateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    for fmt in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(Utc.from_utc_datetime(&naive).fixed_offset());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive).fixed_offset())
}

/// Human-readable timestamp, or the raw string when it can't be parsed
pub fn format_timestamp(timestamp: Option<&str>, zone: &DisplayZone) -> String {
    match timestamp {
        None | Some("") => "None".to_string(),
        Some(raw) => match parse_iso(raw) {
            Some(instant) => zone.format(&instant),
            None => raw.to_string(),
        },
    }
}

/// Compact JSON with a space after `,` and `:`, e.g. `{"k": 1, "l": [1, 2]}`
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

/// Payload as shown in listings: JSON, non-ASCII kept, spaced separators
pub fn payload_json(payload: &Value) -> String {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
    match payload.serialize(&mut ser) {
        Ok(()) => String::from_utf8(buf).unwrap_or_else(|_| payload.to_string()),
        Err(_) => payload.to_string(),
    }
}

/// Render grouped entries as text
pub fn render(grouped: &AuthorGroups, zone: &DisplayZone) -> String {
    let mut parts = Vec::new();
    for (author, entries) in grouped.iter() {
        parts.push(format!("Author: {} ({} message(s))", author, entries.len()));
        for (idx, entry) in entries.iter().enumerate() {
            parts.push(format!("  {}) {}", idx + 1, payload_json(&entry.payload)));
            parts.push(format!(
                "       Timestamp: {}",
                format_timestamp(entry.timestamp.as_deref(), zone)
            ));
        }
        parts.push(String::new());
    }
    parts.join("\n")
}

/// Split text into chunks of at most `max_chunk` characters.
///
/// The header goes on its own line before the first chunk. With a fence
/// language every chunk is wrapped in a code block. Empty text yields the
/// header alone.
pub fn paginate(header: &str, text: &str, max_chunk: usize, lang: Option<&str>) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return vec![header.to_string()];
    }

    chars
        .chunks(max_chunk.max(1))
        .enumerate()
        .map(|(i, chunk)| {
            let chunk: String = chunk.iter().collect();
            let body = match lang {
                Some(lang) => format!("```{}\n{}\n```", lang, chunk),
                None => chunk,
            };
            if i == 0 {
                format!("{}\n{}", header, body)
            } else {
                body
            }
        })
        .collect()
}
