//! Chat client seam and its teloxide implementation

use std::future::Future;
use std::path::Path;

use image_upload_types::{InlineKeyboardMarkup, Reply, ReplyTo};
use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::types::{
    InlineKeyboardButton as TgButton, InlineKeyboardMarkup as TgMarkup, MessageId,
    ParseMode, ReplyParameters,
};
use teloxide::{DownloadError, RequestError};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::errors::{classify, DeliveryFailure};

/// What the upload flow needs from the chat platform
pub trait ChatClient: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Materialize an attachment at `dest`, creating parent directories.
    fn download(
        &self,
        file_id: &str,
        dest: &Path,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Deliver one reply
    fn reply(
        &self,
        to: ReplyTo,
        reply: &Reply,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Telegram request failed: {0}")]
    Request(#[from] RequestError),

    #[error("Reply not delivered ({failure:?}, permanent: {permanent}): {source}", permanent = .failure.is_permanent())]
    Delivery {
        failure: DeliveryFailure,
        source: RequestError,
    },

    #[error("Download failed: {0}")]
    Download(#[from] DownloadError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid button URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Telegram Bot API client
#[derive(Clone)]
pub struct TelegramChat {
    bot: Bot,
}

impl TelegramChat {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

impl ChatClient for TelegramChat {
    type Error = ChatError;

    async fn download(&self, file_id: &str, dest: &Path) -> Result<(), ChatError> {
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let file = self.bot.get_file(file_id).await?;
        debug!("Downloading {} to {}", file.path, dest.display());

        let mut dst = tokio::fs::File::create(dest).await?;
        self.bot.download_file(&file.path, &mut dst).await?;
        dst.flush().await?;

        Ok(())
    }

    async fn reply(&self, to: ReplyTo, reply: &Reply) -> Result<(), ChatError> {
        let mut req = self.bot.send_message(ChatId(to.chat_id), reply.text.clone());

        if reply.html {
            req = req.parse_mode(ParseMode::Html);
        }
        if reply.quote {
            req = req.reply_parameters(ReplyParameters::new(MessageId(to.message_id)));
        }
        if let Some(keyboard) = &reply.keyboard {
            req = req.reply_markup(convert_keyboard(keyboard)?);
        }

        req.await.map_err(|source| ChatError::Delivery {
            failure: classify(&source),
            source,
        })?;

        Ok(())
    }
}

/// Convert our url keyboard to teloxide's
pub(crate) fn convert_keyboard(keyboard: &InlineKeyboardMarkup) -> Result<TgMarkup, url::ParseError> {
    let rows = keyboard
        .inline_keyboard
        .iter()
        .map(|row| {
            row.iter()
                .map(|button| Ok(TgButton::url(button.text.clone(), url::Url::parse(&button.url)?)))
                .collect::<Result<Vec<_>, url::ParseError>>()
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(TgMarkup::new(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image_upload_types::InlineKeyboardButton;
    use teloxide::types::InlineKeyboardButtonKind;

    #[test]
    fn test_convert_url_keyboard() {
        let keyboard = InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::url(
            "➕ Add me to a group",
            "https://t.me/imgbot?startgroup",
        )]]);

        let converted = convert_keyboard(&keyboard).unwrap();
        let button = &converted.inline_keyboard[0][0];
        assert_eq!(button.text, "➕ Add me to a group");
        match &button.kind {
            InlineKeyboardButtonKind::Url(url) => {
                assert_eq!(url.as_str(), "https://t.me/imgbot?startgroup")
            }
            other => panic!("expected url button, got {:?}", other),
        }
    }

    #[test]
    fn test_delivery_error_carries_classification() {
        let err = ChatError::Delivery {
            failure: classify(&RequestError::Api(teloxide::ApiError::BotBlocked)),
            source: RequestError::Api(teloxide::ApiError::BotBlocked),
        };
        let text = err.to_string();
        assert!(text.contains("BotRemoved"));
        assert!(text.contains("permanent: true"));
    }

    #[test]
    fn test_convert_rejects_bad_url() {
        let keyboard = InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::url(
            "broken", "not a url",
        )]]);
        assert!(convert_keyboard(&keyboard).is_err());
    }
}
