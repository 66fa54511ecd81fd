//! Chat commands understood by the bot
//!
//! `!save <text>` stores a note, `!load [<timezone>]` lists saved notes.
//! Everything else is ignored.

pub mod router;

#[cfg(test)]
mod router_tests;

pub use router::CommandRouter;

use crate::channels::types::InboundMessage;

pub const SAVE_PREFIX: &str = "!save";
pub const LOAD_PREFIX: &str = "!load";

/// Handles one inbound message and returns the replies to send, in order.
///
/// An `Err` means the command failed internally (e.g. the data file could
/// not be written); nothing should be sent to the channel in that case.
pub trait MessageHandler: Send + Sync {
    fn handle(&self, message: &InboundMessage) -> Result<Vec<String>, String>;
}

/// A recognized command with its trimmed argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    Save(&'a str),
    /// Optional timezone name; empty when none was given
    Load(&'a str),
}

impl<'a> Command<'a> {
    pub fn parse(text: &'a str) -> Option<Self> {
        if let Some(rest) = text.strip_prefix(SAVE_PREFIX) {
            // The text starts after `!save ` whatever the sixth character is
            let text = rest.chars().next().map_or("", |c| &rest[c.len_utf8()..]);
            return Some(Command::Save(text.trim()));
        }
        text.strip_prefix(LOAD_PREFIX)
            .map(|rest| Command::Load(rest.trim()))
    }
}
