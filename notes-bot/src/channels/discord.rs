use crate::channels::types::InboundMessage;
use crate::commands::MessageHandler;
use chrono::{DateTime, Utc};
use serenity::all::{Client, Context, EventHandler, GatewayIntents, Message, Ready};
use std::num::NonZeroU16;
use std::sync::Arc;

struct DiscordHandler {
    handler: Arc<dyn MessageHandler>,
}

/// Display form of a Discord user. Legacy accounts keep their discriminator.
fn author_display_name(name: &str, discriminator: Option<NonZeroU16>) -> String {
    match discriminator {
        Some(disc) => format!("{}#{:04}", name, disc.get()),
        None => name.to_string(),
    }
}

/// Gateway timestamps display as RFC 3339, fractional seconds included
fn parse_created_at(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn normalize(msg: &Message) -> InboundMessage {
    let created_at_raw = msg.timestamp.to_string();
    InboundMessage {
        author: author_display_name(&msg.author.name, msg.author.discriminator),
        text: msg.content.clone(),
        created_at: parse_created_at(&created_at_raw),
        created_at_raw,
    }
}

/// Run a command on a blocking thread; the store does synchronous file I/O under a lock
async fn handle_off_runtime(
    handler: Arc<dyn MessageHandler>,
    inbound: InboundMessage,
) -> Result<Vec<String>, String> {
    tokio::task::spawn_blocking(move || handler.handle(&inbound))
        .await
        .map_err(|e| format!("Command task failed: {}", e))?
}

#[serenity::async_trait]
impl EventHandler for DiscordHandler {
    async fn message(&self, ctx: Context, msg: Message) {
        // Ignore messages from bots (including ourselves)
        if msg.author.bot {
            return;
        }

        let inbound = normalize(&msg);
        let author = inbound.author.clone();
        let replies = match handle_off_runtime(self.handler.clone(), inbound).await {
            Ok(replies) => replies,
            Err(e) => {
                log::error!("Discord: Command from {} failed: {}", author, e);
                return;
            }
        };

        for reply in replies {
            if let Err(e) = msg.channel_id.say(&ctx.http, &reply).await {
                log::error!("Failed to send Discord message: {}", e);
                return;
            }
        }
    }

    async fn ready(&self, _ctx: Context, ready: Ready) {
        log::info!(
            "Discord: Logged on as {}",
            author_display_name(&ready.user.name, ready.user.discriminator)
        );
    }
}

/// Gateway intents the bot needs; message content is required to read commands
pub fn intents() -> GatewayIntents {
    GatewayIntents::GUILD_MESSAGES | GatewayIntents::DIRECT_MESSAGES | GatewayIntents::MESSAGE_CONTENT
}

/// Connect to Discord and serve commands until the gateway closes or Ctrl-C is received
pub async fn start_discord_listener(
    bot_token: &str,
    handler: Arc<dyn MessageHandler>,
) -> Result<(), String> {
    log::info!("Discord: Token length = {}", bot_token.len());

    let mut client = Client::builder(bot_token, intents())
        .event_handler(DiscordHandler { handler })
        .await
        .map_err(|e| format!("Failed to create Discord client: {}", e))?;

    log::info!("Discord: Client created successfully");

    // Get shard manager for shutdown
    let shard_manager = client.shard_manager.clone();

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            log::info!("Discord: Received shutdown signal");
            shard_manager.shutdown_all().await;
        }
        result = client.start() => {
            match result {
                Ok(()) => log::info!("Discord: Client stopped"),
                Err(e) => {
                    let error = format!("Discord client error: {}", e);
                    log::error!("{}", error);
                    return Err(error);
                }
            }
        }
    }

    Ok(())
}
