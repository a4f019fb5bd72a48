//! Chat and reply types

use serde::{Deserialize, Serialize};

/// Telegram chat type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatType {
    Private,
    Group,
    Supergroup,
    Channel,
}

impl ChatType {
    /// Groups and supergroups behave the same for the bot
    pub fn is_group(&self) -> bool {
        matches!(self, Self::Group | Self::Supergroup)
    }
}

/// The message a reply is addressed to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ReplyTo {
    pub chat_id: i64,
    pub message_id: i32,
}

impl ReplyTo {
    pub fn new(chat_id: i64, message_id: i32) -> Self {
        Self { chat_id, message_id }
    }

    /// Bot API ids of groups and supergroups are negative
    pub fn is_group_chat(&self) -> bool {
        self.chat_id < 0
    }
}

/// Inline keyboard button that opens a URL
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InlineKeyboardButton {
    pub text: String,
    pub url: String,
}

impl InlineKeyboardButton {
    /// Button that opens a URL
    pub fn url(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: url.into(),
        }
    }
}

/// Inline keyboard markup
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

impl InlineKeyboardMarkup {
    /// Create a new inline keyboard with rows of buttons
    pub fn new(rows: Vec<Vec<InlineKeyboardButton>>) -> Self {
        Self {
            inline_keyboard: rows,
        }
    }
}

/// An outbound reply, independent of the chat library
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyboard: Option<InlineKeyboardMarkup>,
    /// Quote the message being replied to
    #[serde(default)]
    pub quote: bool,
    /// `text` is HTML; otherwise it is sent verbatim
    #[serde(default)]
    pub html: bool,
}

impl Reply {
    /// HTML reply that does not quote the triggering message
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
            quote: false,
            html: true,
        }
    }

    /// HTML reply that quotes the message it answers
    pub fn quoted(text: impl Into<String>) -> Self {
        Self {
            quote: true,
            ..Self::text(text)
        }
    }

    /// Verbatim reply that quotes the message it answers
    pub fn verbatim_quoted(text: impl Into<String>) -> Self {
        Self {
            html: false,
            ..Self::quoted(text)
        }
    }

    /// Quote the answered message when `to` is a group chat
    pub fn quote_in_groups(mut self, to: ReplyTo) -> Self {
        self.quote |= to.is_group_chat();
        self
    }

    pub fn with_keyboard(mut self, keyboard: InlineKeyboardMarkup) -> Self {
        self.keyboard = Some(keyboard);
        self
    }
}
