//! Upload request handling: validate → download → upload → reply → clean up.
//!
//! Each event runs sequentially in its own task and owns its [`LocalFile`];
//! nothing here is shared between events except the immutable service.

use std::path::{Path, PathBuf};

use image_upload_types::{
    validate, InboundAttachment, Rejection, Reply, ReplyTo, UploadError, UploadRequest,
    ValidationOutcome,
};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::chat::ChatClient;
use crate::fs::{ExistsFile, RemoveFile};
use crate::gateway::{HostedImage, ImageHost};
use crate::replies;

/// Terminal state of one upload request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// Refused before anything was downloaded
    Rejected(Rejection),
    Uploaded(HostedImage),
    /// Download or upload failed; the user got the message
    Failed(UploadError),
}

/// Temporary on-disk copy of one attachment.
///
/// Created only after validation passed. [`LocalFile::release`] consumes
/// it, so every event removes its copy at most once.
#[derive(Debug)]
pub struct LocalFile {
    path: PathBuf,
}

impl LocalFile {
    /// Pick a unique path for `attachment` under `dir`
    pub fn for_attachment(dir: &Path, attachment: &InboundAttachment) -> Self {
        let stem: String = attachment
            .file_unique_id
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
            .take(64)
            .collect();

        let name = format!(
            "{}-{}.{}",
            if stem.is_empty() { "image" } else { &stem },
            Uuid::new_v4().simple(),
            attachment.extension()
        );

        Self {
            path: dir.join(name),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the copy if it is still there
    pub fn release<F: ExistsFile + RemoveFile>(self, fs: &F) {
        remove_if_exists(fs, &self.path);
    }
}

/// Best-effort removal; a missing file is not an error.
pub fn remove_if_exists<F: ExistsFile + RemoveFile>(fs: &F, path: &Path) {
    if !fs.exists(path) {
        return;
    }
    match fs.remove_file(path) {
        Ok(()) => debug!("Removed {}", path.display()),
        Err(e) => warn!("Failed to remove {}: {}", path.display(), e),
    }
}

/// Everything an event handler needs, built once at startup
pub struct UploadService<C, H, F> {
    chat: C,
    host: H,
    fs: F,
    temp_dir: PathBuf,
}

impl<C, H, F> UploadService<C, H, F>
where
    C: ChatClient,
    H: ImageHost,
    F: ExistsFile + RemoveFile + Send + Sync,
{
    pub fn new(chat: C, host: H, fs: F, temp_dir: PathBuf) -> Self {
        Self {
            chat,
            host,
            fs,
            temp_dir,
        }
    }

    /// Send a reply; delivery failures are logged and dropped
    pub async fn reply(&self, to: ReplyTo, reply: Reply) {
        if let Err(e) = self.chat.reply(to, &reply).await {
            error!(
                "Failed to deliver reply to message {} in chat {}: {}",
                to.message_id, to.chat_id, e
            );
        }
    }

    /// Run one upload request to its terminal state
    pub async fn handle_upload(&self, request: UploadRequest) -> UploadOutcome {
        let reply_to = request.reply_to;

        let attachment = match (validate(request.attachment.as_ref()), request.attachment) {
            (ValidationOutcome::Accepted, Some(attachment)) => attachment,
            (outcome, _) => {
                let reason = outcome.rejection().unwrap_or(Rejection::UnsupportedType);
                warn!(
                    "Rejected attachment on message {} in chat {}: {:?}",
                    reply_to.message_id, reply_to.chat_id, reason
                );
                self.reply(reply_to, replies::rejected(reason)).await;
                return UploadOutcome::Rejected(reason);
            }
        };

        let local = LocalFile::for_attachment(&self.temp_dir, &attachment);
        info!(
            "Accepted {:?} ({} bytes) from chat {}",
            attachment.source_kind, attachment.size_bytes, reply_to.chat_id
        );

        if let Err(e) = self.chat.download(&attachment.file_id, local.path()).await {
            let error = UploadError::new(e.to_string());
            warn!("Download of {} failed: {}", attachment.file_id, error);
            self.reply(reply_to, replies::upload_failed(&error)).await;
            local.release(&self.fs);
            return UploadOutcome::Failed(error);
        }

        match self.host.upload(local.path()).await {
            Ok(image) => {
                local.release(&self.fs);
                info!("Uploaded image for chat {}: {}", reply_to.chat_id, image.url);
                self.reply(reply_to, replies::uploaded(&image.url)).await;
                UploadOutcome::Uploaded(image)
            }
            Err(error) => {
                warn!("Upload for chat {} failed: {}", reply_to.chat_id, error);
                self.reply(reply_to, replies::upload_failed(&error)).await;
                local.release(&self.fs);
                UploadOutcome::Failed(error)
            }
        }
    }
}
