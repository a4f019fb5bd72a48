//! Inbound attachment metadata

use serde::{Deserialize, Serialize};

/// How the image reached the bot
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Platform-compressed photo
    Photo,
    /// Arbitrary file sent as a document
    Document,
}

/// An attachment read from one inbound message.
///
/// Built once per event and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InboundAttachment {
    pub file_id: String,
    pub file_unique_id: String,
    /// Declared MIME type. Photos carry none; documents usually do.
    pub mime_type: Option<String>,
    pub size_bytes: u64,
    pub file_name: Option<String>,
    pub source_kind: SourceKind,
}

impl InboundAttachment {
    /// Create a photo attachment
    pub fn photo(file_id: impl Into<String>, file_unique_id: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            file_id: file_id.into(),
            file_unique_id: file_unique_id.into(),
            mime_type: None,
            size_bytes,
            file_name: None,
            source_kind: SourceKind::Photo,
        }
    }

    /// Create a document attachment
    pub fn document(
        file_id: impl Into<String>,
        file_unique_id: impl Into<String>,
        mime_type: Option<String>,
        size_bytes: u64,
    ) -> Self {
        Self {
            file_id: file_id.into(),
            file_unique_id: file_unique_id.into(),
            mime_type,
            size_bytes,
            file_name: None,
            source_kind: SourceKind::Document,
        }
    }

    /// Set the original file name
    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    /// File extension to use for the local copy.
    ///
    /// Prefers the sender's file name, then the declared MIME type.
    /// Photos are always JPEG on Telegram.
    pub fn extension(&self) -> &str {
        if let Some(ext) = self
            .file_name
            .as_deref()
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext)
            .filter(|ext| !ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        {
            return ext;
        }

        match self.source_kind {
            SourceKind::Photo => "jpg",
            SourceKind::Document => match self.mime_type.as_deref() {
                Some("image/jpeg") => "jpg",
                Some("image/png") => "png",
                Some("image/gif") => "gif",
                Some("image/bmp") => "bmp",
                Some("image/webp") => "webp",
                Some("image/svg+xml") => "svg",
                _ => "bin",
            },
        }
    }
}
