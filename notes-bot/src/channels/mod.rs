pub mod discord;
pub mod types;

pub use discord::start_discord_listener;
pub use types::InboundMessage;
