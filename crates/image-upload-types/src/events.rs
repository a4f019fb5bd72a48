//! Normalized inbound events
//!
//! The router turns each chat-library update into exactly one of these,
//! so handlers match on a closed set of cases instead of probing messages.

use serde::{Deserialize, Serialize};

use crate::attachment::InboundAttachment;
use crate::chat::ReplyTo;

/// Commands the bot answers to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BotCommand {
    Start,
    Help,
    Repo,
    Link,
}

impl BotCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Help => "help",
            Self::Repo => "repo",
            Self::Link => "link",
        }
    }

    /// Parse the leading command of a message text.
    ///
    /// Accepts `/name` and `/name@bot_username`. A command addressed to a
    /// different bot yields `None`. Matching is case-insensitive.
    pub fn parse(text: &str, bot_username: Option<&str>) -> Option<Self> {
        let first = text.split_whitespace().next()?;
        let body = first.strip_prefix('/')?;

        let (name, target) = match body.split_once('@') {
            Some((name, target)) => (name, Some(target)),
            None => (body, None),
        };

        if let (Some(target), Some(username)) = (target, bot_username) {
            if !target.eq_ignore_ascii_case(username) {
                return None;
            }
        }

        match name.to_ascii_lowercase().as_str() {
            "start" => Some(Self::Start),
            "help" => Some(Self::Help),
            "repo" => Some(Self::Repo),
            "link" => Some(Self::Link),
            _ => None,
        }
    }
}

/// The user who sent a message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Sender {
    pub id: u64,
    pub first_name: String,
}

/// A request to upload the attachment of one resolved message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadRequest {
    /// The message carrying the attachment; replies quote it.
    pub reply_to: ReplyTo,
    /// `None` when the resolved message has neither photo nor document
    pub attachment: Option<InboundAttachment>,
}

/// One routed chat event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundEvent {
    /// The bot itself was added to a group
    BotAdded { reply_to: ReplyTo },
    /// A command answered with a fixed reply.
    ///
    /// `Link` only lands here when it cannot be turned into an upload.
    Command {
        command: BotCommand,
        reply_to: ReplyTo,
        sender: Option<Sender>,
    },
    /// A private photo/document, or a group `/link` reply
    Upload(UploadRequest),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_commands() {
        assert_eq!(BotCommand::parse("/start", None), Some(BotCommand::Start));
        assert_eq!(BotCommand::parse("/help", None), Some(BotCommand::Help));
        assert_eq!(BotCommand::parse("/repo", None), Some(BotCommand::Repo));
        assert_eq!(BotCommand::parse("/link", None), Some(BotCommand::Link));
    }

    #[test]
    fn test_parse_ignores_arguments_and_case() {
        assert_eq!(
            BotCommand::parse("/LINK please", Some("imgbot")),
            Some(BotCommand::Link)
        );
        assert_eq!(
            BotCommand::parse("  /help   me", None),
            Some(BotCommand::Help)
        );
    }

    #[test]
    fn test_parse_addressed_commands() {
        assert_eq!(
            BotCommand::parse("/link@ImgBot", Some("imgbot")),
            Some(BotCommand::Link)
        );
        assert_eq!(BotCommand::parse("/link@otherbot", Some("imgbot")), None);
    }

    #[test]
    fn test_parse_rejects_non_commands() {
        assert_eq!(BotCommand::parse("hello", None), None);
        assert_eq!(BotCommand::parse("", None), None);
        assert_eq!(BotCommand::parse("/unknown", None), None);
        assert_eq!(BotCommand::parse("link /link", None), None);
    }

    #[test]
    fn test_command_names_round_trip_through_parse() {
        for cmd in [BotCommand::Start, BotCommand::Help, BotCommand::Repo, BotCommand::Link] {
            let text = format!("/{}", cmd.name());
            assert_eq!(BotCommand::parse(&text, None), Some(cmd));
        }
    }

    #[test]
    fn test_event_serialization_tag() {
        let event = InboundEvent::BotAdded {
            reply_to: ReplyTo::new(-100, 7),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "bot_added");
        assert_eq!(json["reply_to"]["message_id"], 7);
    }
}
