//! Validation policy for inbound attachments
//!
//! Decides, before anything is downloaded, whether an attachment may be
//! uploaded. Pure and deterministic; the allow-set and the size ceiling are
//! fixed constants.

use serde::{Deserialize, Serialize};

use crate::attachment::{InboundAttachment, SourceKind};

/// MIME types accepted for documents
pub const ALLOWED_MIME_TYPES: [&str; 6] = [
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/bmp",
    "image/webp",
    "image/svg+xml",
];

/// Largest accepted attachment (10 MiB). Bigger images lose the Telegram link preview.
pub const MAX_FILE_SIZE_BYTES: u64 = 10_485_760;

/// Why an attachment was refused
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    /// Not an image, or no attachment at all
    UnsupportedType,
    /// Larger than [`MAX_FILE_SIZE_BYTES`]
    TooLarge,
}

/// Result of applying the policy
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum ValidationOutcome {
    Accepted,
    Rejected(Rejection),
}

impl ValidationOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            Self::Accepted => None,
            Self::Rejected(reason) => Some(*reason),
        }
    }
}

/// Check whether a MIME type is in the allow-set.
///
/// Parameters such as `; charset=...` are ignored and the comparison is
/// case-insensitive.
pub fn is_allowed_mime_type(mime_type: &str) -> bool {
    let essence = mime_type.split(';').next().unwrap_or_default().trim();
    ALLOWED_MIME_TYPES
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(essence))
}

/// Apply the policy to the attachment resolved from a message.
///
/// Rules, in order:
/// 1. a document whose MIME type is missing or outside [`ALLOWED_MIME_TYPES`] is unsupported
/// 2. no attachment at all is unsupported
/// 3. anything over [`MAX_FILE_SIZE_BYTES`] is too large
///
/// Photos skip the type check.
pub fn validate(attachment: Option<&InboundAttachment>) -> ValidationOutcome {
    let Some(attachment) = attachment else {
        return ValidationOutcome::Rejected(Rejection::UnsupportedType);
    };

    if attachment.source_kind == SourceKind::Document
        && !attachment
            .mime_type
            .as_deref()
            .is_some_and(is_allowed_mime_type)
    {
        return ValidationOutcome::Rejected(Rejection::UnsupportedType);
    }

    if attachment.size_bytes > MAX_FILE_SIZE_BYTES {
        return ValidationOutcome::Rejected(Rejection::TooLarge);
    }

    ValidationOutcome::Accepted
}
