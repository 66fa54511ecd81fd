use dotenv::dotenv;
use notes_bot::channels::start_discord_listener;
use notes_bot::commands::{CommandRouter, MessageHandler};
use notes_bot::config::{Config, env_vars};
use notes_bot::notes::NoteStore;
use std::sync::Arc;

/// Everything the bot needs, built once at startup and passed down explicitly
pub struct AppContext {
    pub config: Config,
    pub store: Arc<NoteStore>,
    pub router: Arc<dyn MessageHandler>,
}

impl AppContext {
    fn new(config: Config) -> Self {
        let store = Arc::new(NoteStore::new(config.data_file.clone()));
        let router = CommandRouter::new(store.clone(), config.display_zone)
            .with_max_chunk(config.max_chunk)
            .with_fence_language(config.code_fence.clone());
        Self {
            config,
            store,
            router: Arc::new(router),
        }
    }
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("ERROR: {}", e);
            eprintln!("Set it before running this bot, for example:");
            eprintln!("  export {}=\"<your-token>\"", env_vars::DISCORD_TOKEN);
            eprintln!("or put it in a .env file in the working directory.");
            std::process::exit(1);
        }
    };

    let ctx = AppContext::new(config);
    log::info!("Saving notes to {:?}", ctx.store.data_file());
    log::info!(
        "Max chunk {} chars, default timezone {:?}",
        ctx.config.max_chunk,
        ctx.config.display_zone
    );

    if let Err(e) = start_discord_listener(&ctx.config.discord_token, ctx.router.clone()).await {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
