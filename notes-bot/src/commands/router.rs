use super::{Command, MessageHandler};
use crate::channels::types::InboundMessage;
use crate::notes::format::{self, DEFAULT_MAX_CHUNK};
use crate::notes::{DisplayZone, Entry, NoteStore, StoreContents};
use std::sync::Arc;

const LOAD_HEADER: &str = "Saved messages:";

/// Routes `!save` / `!load` to the note store and renders replies
pub struct CommandRouter {
    store: Arc<NoteStore>,
    /// Zone used when `!load` has no argument
    default_zone: DisplayZone,
    max_chunk: usize,
    fence_language: Option<String>,
}

impl CommandRouter {
    pub fn new(store: Arc<NoteStore>, default_zone: DisplayZone) -> Self {
        Self {
            store,
            default_zone,
            max_chunk: DEFAULT_MAX_CHUNK,
            fence_language: None,
        }
    }

    pub fn with_max_chunk(mut self, max_chunk: usize) -> Self {
        self.max_chunk = max_chunk;
        self
    }

    pub fn with_fence_language(mut self, lang: Option<String>) -> Self {
        self.fence_language = lang;
        self
    }

    fn handle_save(&self, message: &InboundMessage, text: &str) -> Result<Vec<String>, String> {
        if text.is_empty() {
            return Ok(vec![
                "Please provide text to save. Usage: `!save your text here`".to_string(),
            ]);
        }

        let entry = Entry::new(&message.author, message.timestamp(), text);
        self.store.append(&entry)?;

        Ok(vec![format!("Saved to `{}`.", self.store.display_name())])
    }

    fn handle_load(&self, tz_arg: &str) -> Result<Vec<String>, String> {
        let zone = if tz_arg.is_empty() {
            self.default_zone
        } else {
            match DisplayZone::from_name(tz_arg) {
                Some(zone) => zone,
                None => {
                    return Ok(vec![format!(
                        "Unknown timezone: `{}`. Use an IANA timezone name like `Europe/Berlin`.",
                        tz_arg
                    )]);
                }
            }
        };

        let file = self.store.display_name();
        let entries = match self.store.read()? {
            StoreContents::Missing => {
                return Ok(vec![format!("No data found. `{}` does not exist.", file)]);
            }
            StoreContents::Corrupted => {
                return Ok(vec![format!(
                    "Error reading `{}`. The file may be corrupted.",
                    file
                )]);
            }
            StoreContents::Entries(entries) => entries,
        };

        let grouped = format::group_by_author(entries);
        log::debug!(
            "[NOTES] Rendering {} entries from {} authors",
            grouped.entry_count(),
            grouped.len()
        );
        let text = format::render(&grouped, &zone);

        Ok(format::paginate(
            LOAD_HEADER,
            &text,
            self.max_chunk,
            self.fence_language.as_deref(),
        ))
    }
}

impl MessageHandler for CommandRouter {
    fn handle(&self, message: &InboundMessage) -> Result<Vec<String>, String> {
        match Command::parse(&message.text) {
            Some(Command::Save(text)) => {
                log::info!("[NOTES] !save from {}", message.author);
                self.handle_save(message, text)
            }
            Some(Command::Load(tz_arg)) => {
                log::info!("[NOTES] !load from {} (timezone: {:?})", message.author, tz_arg);
                self.handle_load(tz_arg)
            }
            None => Ok(Vec::new()),
        }
    }
}
