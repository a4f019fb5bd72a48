//! Shared types for the image upload bot
//!
//! This crate holds the transport-agnostic pieces of the bot: inbound
//! attachments, the validation policy applied before anything is
//! downloaded, normalized chat events, composed replies and the upload
//! error surfaced to users.

pub mod attachment;
pub mod chat;
pub mod errors;
pub mod events;
pub mod policy;

// Re-export commonly used types
pub use attachment::{InboundAttachment, SourceKind};
pub use chat::{ChatType, InlineKeyboardButton, InlineKeyboardMarkup, Reply, ReplyTo};
pub use errors::UploadError;
pub use events::{BotCommand, InboundEvent, Sender, UploadRequest};
pub use policy::{validate, Rejection, ValidationOutcome, ALLOWED_MIME_TYPES, MAX_FILE_SIZE_BYTES};
