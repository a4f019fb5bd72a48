//! Telegram image upload bot
//!
//! Accepts photos and image documents in private chats, or through a
//! `/link` reply in groups, uploads them to an image host and answers
//! with the hosted URL.

mod chat;
mod config;
mod errors;
mod fs;
mod gateway;
mod handlers;
mod health;
mod replies;
mod router;
mod upload;

#[cfg(test)]
mod testing;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use teloxide::prelude::*;
use teloxide::types::Message;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::chat::TelegramChat;
use crate::config::{Config, SystemEnv};
use crate::fs::SystemFs;
use crate::gateway::FreeImageHost;
use crate::router::BotIdentity;
use crate::upload::UploadService;

/// Image upload bot CLI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/image-upload-bot.toml")]
    config: String,

    /// Telegram bot token (overrides config file)
    #[arg(long, env = "BOT_TOKEN")]
    bot_token: Option<String>,

    /// Image host API key (overrides config file)
    #[arg(long, env = "API_KEY")]
    api_key: Option<String>,

    /// Health check server port
    #[arg(long, env = "HEALTH_CHECK_PORT", default_value = "3000")]
    health_port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; the process environment may already be set
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            return Err(e).context("Failed to load .env file");
        }
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "image_upload_bot=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting image upload bot");

    let args = Args::parse();

    let config = if Path::new(&args.config).exists() {
        info!("Loading config from file: {}", args.config);
        let mut config = Config::from_file(&args.config)?;
        config.apply_env(&SystemEnv)?;

        if let Some(bot_token) = args.bot_token {
            config.telegram.bot_token = bot_token;
        }
        if let Some(api_key) = args.api_key {
            config.image_host.api_key = api_key;
        }

        config
    } else {
        info!("Config file not found, using environment variables");
        Config::from_env(&SystemEnv)?
    };
    config.validate()?;

    info!("Image host endpoint: {}", config.image_host.endpoint);
    info!("Temporary files in: {}", config.upload.temp_dir.display());

    let bot = Bot::new(&config.telegram.bot_token);

    let identity = match bot.get_me().await {
        Ok(me) => {
            let identity = BotIdentity {
                id: me.id.0,
                username: me.username().to_string(),
            };
            info!("Bot authenticated as: @{}", identity.username);
            identity
        }
        Err(e) => {
            error!("Failed to authenticate bot: {}", e);
            return Err(e.into());
        }
    };

    tokio::fs::create_dir_all(&config.upload.temp_dir)
        .await
        .with_context(|| {
            format!(
                "Failed to create temp directory {}",
                config.upload.temp_dir.display()
            )
        })?;

    let health_state = health::AppState::new(Some(identity.username.clone()));
    let health_port = args.health_port;
    tokio::spawn(async move {
        if let Err(e) = health::start_health_server(health_state, health_port).await {
            error!("Health check server error: {}", e);
        }
    });

    let host = FreeImageHost::new(&config.image_host).context("Failed to build HTTP client")?;
    let service: Arc<handlers::BotService> = Arc::new(UploadService::new(
        TelegramChat::new(bot.clone()),
        host,
        SystemFs,
        config.upload.temp_dir.clone(),
    ));

    info!("Bot initialized, starting message dispatcher...");

    let handler = Update::filter_message()
        .filter_map(|msg: Message, identity: BotIdentity| router::route(&msg, &identity))
        .endpoint(handlers::handle_event);

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![identity, service])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("Image upload bot stopped");
    Ok(())
}
