//! In-memory collaborators for flow and handler tests

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use image_upload_types::{Reply, ReplyTo, UploadError};
use thiserror::Error;

use crate::chat::ChatClient;
use crate::fs::{ExistsFile, MemFs};
use crate::gateway::{HostedImage, ImageHost};

#[derive(Debug, Error)]
#[error("{0}")]
pub struct FakeChatError(String);

/// Records replies; "downloads" by writing into a shared [`MemFs`]
#[derive(Clone)]
pub struct FakeChat {
    fs: MemFs,
    replies: Arc<Mutex<Vec<(ReplyTo, Reply)>>>,
    downloads: Arc<Mutex<Vec<(String, PathBuf)>>>,
    files_at_reply: Arc<Mutex<Vec<usize>>>,
    download_error: Option<String>,
    fail_replies: bool,
}

impl FakeChat {
    pub fn new(fs: MemFs) -> Self {
        Self {
            fs,
            replies: Arc::default(),
            downloads: Arc::default(),
            files_at_reply: Arc::default(),
            download_error: None,
            fail_replies: false,
        }
    }

    /// Downloads leave a partial file behind and then fail
    pub fn failing_downloads(mut self, message: &str) -> Self {
        self.download_error = Some(message.to_string());
        self
    }

    pub fn failing_replies(mut self) -> Self {
        self.fail_replies = true;
        self
    }

    pub fn replies(&self) -> Vec<(ReplyTo, Reply)> {
        self.replies.lock().unwrap().clone()
    }

    pub fn downloads(&self) -> Vec<(String, PathBuf)> {
        self.downloads.lock().unwrap().clone()
    }

    /// How many local files existed each time a reply was sent
    pub fn files_present_at_reply(&self) -> Vec<usize> {
        self.files_at_reply.lock().unwrap().clone()
    }
}

impl ChatClient for FakeChat {
    type Error = FakeChatError;

    async fn download(&self, file_id: &str, dest: &Path) -> Result<(), FakeChatError> {
        self.downloads
            .lock()
            .unwrap()
            .push((file_id.to_string(), dest.to_path_buf()));
        self.fs.insert(dest, format!("bytes of {}", file_id));

        match &self.download_error {
            Some(message) => Err(FakeChatError(message.clone())),
            None => Ok(()),
        }
    }

    async fn reply(&self, to: ReplyTo, reply: &Reply) -> Result<(), FakeChatError> {
        self.files_at_reply.lock().unwrap().push(self.fs.paths().len());
        if self.fail_replies {
            return Err(FakeChatError("Bot was blocked by the user".into()));
        }
        self.replies.lock().unwrap().push((to, reply.clone()));
        Ok(())
    }
}

/// Returns a canned result and records what it was asked to upload
#[derive(Clone)]
pub struct FakeHost {
    fs: MemFs,
    result: Result<HostedImage, UploadError>,
    uploads: Arc<Mutex<Vec<PathBuf>>>,
    saw_existing_file: Arc<Mutex<bool>>,
    consume_file: bool,
}

impl FakeHost {
    pub fn succeeding(url: &str, fs: MemFs) -> Self {
        Self::with_result(Ok(HostedImage { url: url.to_string() }), fs)
    }

    pub fn failing(message: &str, fs: MemFs) -> Self {
        Self::with_result(Err(UploadError::new(message)), fs)
    }

    fn with_result(result: Result<HostedImage, UploadError>, fs: MemFs) -> Self {
        Self {
            fs,
            result,
            uploads: Arc::default(),
            saw_existing_file: Arc::default(),
            consume_file: false,
        }
    }

    /// Make the local copy disappear during the upload
    pub fn consuming_file(mut self) -> Self {
        self.consume_file = true;
        self
    }

    pub fn uploads(&self) -> Vec<PathBuf> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn saw_existing_file(&self) -> bool {
        *self.saw_existing_file.lock().unwrap()
    }
}

impl ImageHost for FakeHost {
    async fn upload(&self, path: &Path) -> Result<HostedImage, UploadError> {
        self.uploads.lock().unwrap().push(path.to_path_buf());
        *self.saw_existing_file.lock().unwrap() = self.fs.exists(path);
        if self.consume_file {
            self.fs.discard(path);
        }
        self.result.clone()
    }
}
