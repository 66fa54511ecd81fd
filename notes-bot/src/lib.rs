//! Discord bot that saves short text notes per user and lists them back.

pub mod channels;
pub mod commands;
pub mod config;
pub mod notes;
