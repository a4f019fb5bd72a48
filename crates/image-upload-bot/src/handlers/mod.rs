//! Event handlers for routed Telegram updates

use std::sync::Arc;

use image_upload_types::{BotCommand, InboundEvent};
use teloxide::prelude::*;
use tracing::info;

use crate::chat::{ChatClient, TelegramChat};
use crate::fs::{ExistsFile, RemoveFile, SystemFs};
use crate::gateway::{FreeImageHost, ImageHost};
use crate::replies;
use crate::router::BotIdentity;
use crate::upload::UploadService;

/// The service wired with production collaborators
pub type BotService = UploadService<TelegramChat, FreeImageHost, SystemFs>;

/// dptree endpoint for every routed message
pub async fn handle_event(
    event: InboundEvent,
    identity: BotIdentity,
    service: Arc<BotService>,
) -> ResponseResult<()> {
    dispatch(service.as_ref(), event, &identity.username).await;
    Ok(())
}

/// Run the handler for one event
pub async fn dispatch<C, H, F>(service: &UploadService<C, H, F>, event: InboundEvent, bot_username: &str)
where
    C: ChatClient,
    H: ImageHost,
    F: ExistsFile + RemoveFile + Send + Sync,
{
    match event {
        InboundEvent::BotAdded { reply_to } => {
            info!("Added to group {}", reply_to.chat_id);
            service
                .reply(reply_to, replies::welcome().quote_in_groups(reply_to))
                .await;
        }
        InboundEvent::Command {
            command,
            reply_to,
            sender,
        } => {
            info!("Received /{} in chat {}", command.name(), reply_to.chat_id);
            let reply = match command {
                BotCommand::Start => replies::start(sender.as_ref(), bot_username),
                BotCommand::Help => replies::help(),
                BotCommand::Repo => replies::repo(),
                BotCommand::Link => replies::link_usage(),
            };
            service.reply(reply_to, reply.quote_in_groups(reply_to)).await;
        }
        InboundEvent::Upload(request) => {
            service.handle_upload(request).await;
        }
    }
}
