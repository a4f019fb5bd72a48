//! Upload error surfaced to users

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A failed upload.
///
/// `message` is shown to the user unchanged, so it carries whatever the
/// image host (or the transport) reported.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[error("{message}")]
pub struct UploadError {
    pub message: String,
}

impl UploadError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_the_bare_message() {
        let err = UploadError::new("quota exceeded");
        assert_eq!(err.to_string(), "quota exceeded");
    }
}
