//! Routes teloxide messages to normalized events.
//!
//! Precedence: membership, `/start` (private), `/help`, uploads, `/repo`,
//! then the `/link` usage hint. Private uploads and group `/link` replies
//! can never both match, since they need different chat types.

use image_upload_types::{
    BotCommand, ChatType, InboundAttachment, InboundEvent, ReplyTo, Sender, UploadRequest,
};
use teloxide::types::Message;
use tracing::debug;

/// Who the bot is, resolved once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotIdentity {
    pub id: u64,
    pub username: String,
}

/// Map one message to at most one event
pub fn route(msg: &Message, identity: &BotIdentity) -> Option<InboundEvent> {
    let reply_to = reply_target(msg);

    if let Some(members) = msg.new_chat_members() {
        return members
            .iter()
            .any(|user| user.id.0 == identity.id)
            .then_some(InboundEvent::BotAdded { reply_to });
    }

    let chat_type = chat_type(msg);
    let is_private = chat_type == ChatType::Private;
    let is_group = chat_type.is_group();

    let command = msg
        .text()
        .or_else(|| msg.caption())
        .and_then(|text| BotCommand::parse(text, Some(&identity.username)));

    let sender = msg.from.as_ref().map(|user| Sender {
        id: user.id.0,
        first_name: user.first_name.clone(),
    });

    let event = match command {
        Some(BotCommand::Start) if is_private => Some(InboundEvent::Command {
            command: BotCommand::Start,
            reply_to,
            sender,
        }),
        Some(BotCommand::Help) => Some(InboundEvent::Command {
            command: BotCommand::Help,
            reply_to,
            sender,
        }),
        Some(BotCommand::Link) if is_group => match explicit_reply(msg) {
            Some(target) => Some(InboundEvent::Upload(UploadRequest {
                reply_to: reply_target(target),
                attachment: extract_attachment(target),
            })),
            None => Some(InboundEvent::Command {
                command: BotCommand::Link,
                reply_to,
                sender,
            }),
        },
        _ if is_private && (msg.document().is_some() || msg.photo().is_some()) => {
            Some(InboundEvent::Upload(UploadRequest {
                reply_to,
                attachment: extract_attachment(msg),
            }))
        }
        Some(BotCommand::Repo) => Some(InboundEvent::Command {
            command: BotCommand::Repo,
            reply_to,
            sender,
        }),
        _ => None,
    };

    if let Some(event) = &event {
        debug!("Routed message {} in chat {} to {:?}", msg.id.0, msg.chat.id.0, event);
    }

    event
}

/// The message `msg` replies to, unless that is only the root of the forum
/// topic `msg` was posted in.
fn explicit_reply(msg: &Message) -> Option<&Message> {
    msg.reply_to_message()
        .filter(|target| !(msg.is_topic_message && target.forum_topic_created().is_some()))
}

fn chat_type(msg: &Message) -> ChatType {
    if msg.chat.is_private() {
        ChatType::Private
    } else if msg.chat.is_supergroup() {
        ChatType::Supergroup
    } else if msg.chat.is_group() {
        ChatType::Group
    } else {
        ChatType::Channel
    }
}

fn reply_target(msg: &Message) -> ReplyTo {
    ReplyTo::new(msg.chat.id.0, msg.id.0)
}

/// Read the attachment of a message: a document first, else the largest photo size.
pub fn extract_attachment(msg: &Message) -> Option<InboundAttachment> {
    if let Some(doc) = msg.document() {
        let mut attachment = InboundAttachment::document(
            doc.file.id.clone(),
            doc.file.unique_id.clone(),
            doc.mime_type.as_ref().map(|mime| mime.essence_str().to_string()),
            u64::from(doc.file.size),
        );
        attachment.file_name = doc.file_name.clone();
        return Some(attachment);
    }

    msg.photo()
        .and_then(|sizes| sizes.iter().max_by_key(|size| (size.width * size.height, size.file.size)))
        .map(|photo| {
            InboundAttachment::photo(
                photo.file.id.clone(),
                photo.file.unique_id.clone(),
                u64::from(photo.file.size),
            )
        })
}
