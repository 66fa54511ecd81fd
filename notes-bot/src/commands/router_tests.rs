//! End-to-end tests for `!save` / `!load` through the `MessageHandler` seam.
//!
//! Each test gets its own data file in a temp dir and drives the router
//! exactly as the Discord adapter would, without a gateway connection.

use crate::channels::types::InboundMessage;
use crate::commands::{CommandRouter, MessageHandler};
use crate::notes::{DisplayZone, NoteStore, StoreContents};
use chrono::{TimeZone, Utc};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// Router wired to a fresh data file, rendering in UTC
struct TestHarness {
    router: CommandRouter,
    data_file: PathBuf,
    _dir: TempDir,
}

impl TestHarness {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let data_file = dir.path().join("data.json");
        let store = Arc::new(NoteStore::new(&data_file));
        let zone = DisplayZone::from_name("UTC").expect("UTC zone");
        Self {
            router: CommandRouter::new(store, zone),
            data_file,
            _dir: dir,
        }
    }

    fn with_contents(contents: &str) -> Self {
        let harness = Self::new();
        fs::write(&harness.data_file, contents).expect("write data file");
        harness
    }

    fn send(&self, author: &str, text: &str) -> Vec<String> {
        let message = InboundMessage {
            author: author.to_string(),
            text: text.to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 15, 12, 30, 0).single(),
            created_at_raw: "2024-01-15 12:30:00+00:00".to_string(),
        };
        self.router.handle(&message).expect("handle")
    }

    fn file_contents(&self) -> Option<String> {
        fs::read_to_string(&self.data_file).ok()
    }
}

#[test]
fn test_save_then_load_contains_quoted_text() {
    let h = TestHarness::new();

    let replies = h.send("alice", "!save buy milk");
    assert_eq!(replies, vec!["Saved to `data.json`."]);

    let replies = h.send("alice", "!load");
    assert_eq!(replies.len(), 1);
    let out = &replies[0];
    assert!(out.starts_with("Saved messages:\n"));
    assert!(out.contains("Author: alice (1 message(s))"));
    assert!(out.contains("  1) \"buy milk\""));
    assert!(out.contains("       Timestamp: 2024-01-15 12:30:00 UTC"));
}

#[test]
fn test_save_trims_text_and_keeps_unicode() {
    let h = TestHarness::new();
    h.send("zoë", "!save   café ☕  ");

    let contents = h.file_contents().unwrap();
    assert!(contents.contains("\"payload\": \"café ☕\""));
    assert!(contents.contains("\"author\": \"zoë\""));
    assert!(contents.contains("\"timestamp\": \"2024-01-15T12:30:00+00:00\""));

    let out = h.send("zoë", "!load").join("");
    assert!(out.contains("1) \"café ☕\""));
}

#[test]
fn test_entry_count_matches_appends() {
    let h = TestHarness::new();
    for i in 0..4 {
        h.send("alice", &format!("!save a{}", i));
    }
    for i in 0..3 {
        h.send("bob", &format!("!save b{}", i));
    }

    let out = h.send("carol", "!load").join("");
    assert!(out.contains("Author: alice (4 message(s))"));
    assert!(out.contains("Author: bob (3 message(s))"));
    assert_eq!(out.matches("Timestamp:").count(), 7);
    assert!(out.find("Author: alice").unwrap() < out.find("Author: bob").unwrap());
}

#[test]
fn test_load_without_file_reports_no_data() {
    let h = TestHarness::new();
    assert_eq!(
        h.send("alice", "!load"),
        vec!["No data found. `data.json` does not exist."]
    );
}

#[test]
fn test_load_corrupted_file_is_stable() {
    let h = TestHarness::with_contents("{{{ not json");

    let expected = vec!["Error reading `data.json`. The file may be corrupted."];
    assert_eq!(h.send("alice", "!load"), expected);
    assert_eq!(h.send("alice", "!load"), expected);
    assert_eq!(h.file_contents().as_deref(), Some("{{{ not json"));
}

#[test]
fn test_save_over_corrupted_file_resets_it() {
    let h = TestHarness::with_contents("{{{ not json");

    h.send("alice", "!save fresh start");

    let out = h.send("alice", "!load").join("");
    assert!(out.contains("Author: alice (1 message(s))"));
    assert!(out.contains("\"fresh start\""));
}

#[test]
fn test_blank_save_replies_usage_without_touching_file() {
    let h = TestHarness::new();

    let replies = h.send("alice", "!save    ");
    assert_eq!(
        replies,
        vec!["Please provide text to save. Usage: `!save your text here`"]
    );
    assert!(h.file_contents().is_none());

    let h = TestHarness::with_contents("[]");
    h.send("alice", "!save");
    assert_eq!(h.file_contents().as_deref(), Some("[]"));
}

#[test]
fn test_unknown_timezone_does_not_read_store() {
    // A corrupted file would produce a different reply if it were read
    let h = TestHarness::with_contents("{{{ not json");

    let replies = h.send("alice", "!load badzone");
    assert_eq!(
        replies,
        vec!["Unknown timezone: `badzone`. Use an IANA timezone name like `Europe/Berlin`."]
    );
}

#[test]
fn test_load_with_timezone_argument() {
    let h = TestHarness::new();
    h.send("alice", "!save note");

    let out = h.send("alice", "!load Asia/Tokyo").join("");
    assert!(out.contains("Timestamp: 2024-01-15 21:30:00 JST"));
}

#[test]
fn test_legacy_entries_group_under_unknown() {
    let h = TestHarness::with_contents(r#"["an old note", {"author": "bob", "payload": "new"}]"#);

    let out = h.send("alice", "!load").join("");
    assert!(out.contains("Author: unknown (1 message(s))"));
    assert!(out.contains("  1) \"an old note\"\n       Timestamp: None"));
    assert!(out.contains("Author: bob (1 message(s))"));
}

#[test]
fn test_single_object_file_is_one_entry() {
    let h = TestHarness::with_contents(
        r#"{"author": "bob", "timestamp": "2024-01-15T12:30:00", "payload": "solo"}"#,
    );

    let out = h.send("alice", "!load").join("");
    assert!(out.contains("Author: bob (1 message(s))"));
    assert!(out.contains("Timestamp: 2024-01-15 12:30:00 UTC"));
}

#[test]
fn test_long_listing_is_paginated() {
    let h = TestHarness::new();
    let long = "x".repeat(1000);
    for _ in 0..5 {
        h.send("alice", &format!("!save {}", long));
    }

    let replies = h.send("alice", "!load");
    assert!(replies.len() >= 3);
    assert!(replies[0].starts_with("Saved messages:\n"));
    for chunk in &replies[1..] {
        assert!(chunk.chars().count() <= 1900);
        assert!(!chunk.starts_with("Saved messages:"));
    }
    let body: String = std::iter::once(replies[0].trim_start_matches("Saved messages:\n"))
        .chain(replies[1..].iter().map(String::as_str))
        .collect();
    assert_eq!(body.matches(&long).count(), 5);
}

#[test]
fn test_custom_chunk_and_fence() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(NoteStore::new(dir.path().join("notes.json")));
    let router = CommandRouter::new(store, DisplayZone::from_name("UTC").unwrap())
        .with_max_chunk(50)
        .with_fence_language(Some("text".to_string()));

    let msg = |text: &str| InboundMessage {
        author: "alice".to_string(),
        text: text.to_string(),
        created_at: None,
        created_at_raw: "raw-time".to_string(),
    };

    assert_eq!(
        router.handle(&msg("!save hello")).unwrap(),
        vec!["Saved to `notes.json`."]
    );

    let replies = router.handle(&msg("!load")).unwrap();
    assert!(replies.len() > 1);
    assert!(replies[0].starts_with("Saved messages:\n```text\n"));
    assert!(replies.iter().all(|r| r.ends_with("\n```")));
    assert!(replies.concat().contains("raw-time"));
}

#[test]
fn test_other_messages_are_ignored() {
    let h = TestHarness::new();
    assert!(h.send("alice", "hello there").is_empty());
    assert!(h.send("alice", "save !save").is_empty());
    assert!(h.file_contents().is_none());
}

#[test]
fn test_save_text_starts_after_prefix_and_one_character() {
    let h = TestHarness::new();

    h.send("alice", "!savexyz hello");
    h.send("alice", "!saveé café");

    let contents = h.file_contents().unwrap();
    assert!(contents.contains("\"payload\": \"yz hello\""));
    assert!(contents.contains("\"payload\": \"café\""));
}

#[cfg(unix)]
#[test]
fn test_write_failure_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    // A dangling link reads as a missing file, but creating through it fails
    // because the target's parent directory does not exist
    let data_file = dir.path().join("data.json");
    std::os::unix::fs::symlink(dir.path().join("gone/target.json"), &data_file).unwrap();

    let store = Arc::new(NoteStore::new(&data_file));
    assert_eq!(store.read().unwrap(), StoreContents::Missing);

    let router = CommandRouter::new(store, DisplayZone::from_name("UTC").unwrap());
    let message = InboundMessage {
        author: "alice".to_string(),
        text: "!save doomed".to_string(),
        created_at: None,
        created_at_raw: String::new(),
    };

    let err = router.handle(&message).unwrap_err();
    assert!(err.starts_with("Failed to write"));
    assert!(!dir.path().join("gone").exists());
}
