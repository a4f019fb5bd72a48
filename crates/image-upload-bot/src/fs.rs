//! Filesystem seam for temporary attachment copies.
//!
//! Only the two operations cleanup needs. Production code uses
//! [`SystemFs`]; tests use [`MemFs`].

use std::path::Path;

pub trait ExistsFile {
    fn exists(&self, path: &Path) -> bool;
}

pub trait RemoveFile {
    fn remove_file(&self, path: &Path) -> std::io::Result<()>;
}

/// Zero-sized type, delegates to `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemFs;

impl ExistsFile for SystemFs {
    #[inline]
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

impl RemoveFile for SystemFs {
    #[inline]
    fn remove_file(&self, path: &Path) -> std::io::Result<()> {
        std::fs::remove_file(path)
    }
}

#[cfg(test)]
pub use mem::MemFs;

#[cfg(test)]
mod mem {
    use std::collections::{HashMap, HashSet};
    use std::io;
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Mutex};

    use super::{ExistsFile, RemoveFile};

    /// In-memory filesystem.
    ///
    /// `Arc<Mutex<…>>` backed so it can be shared with fake collaborators
    /// that "download" into it. Tracks every removal.
    #[derive(Clone, Default)]
    pub struct MemFs {
        files: Arc<Mutex<HashMap<PathBuf, Vec<u8>>>>,
        removed: Arc<Mutex<Vec<PathBuf>>>,
    }

    impl MemFs {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn insert(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
            self.files
                .lock()
                .unwrap()
                .insert(path.as_ref().to_path_buf(), content.into());
        }

        pub fn paths(&self) -> HashSet<PathBuf> {
            self.files.lock().unwrap().keys().cloned().collect()
        }

        pub fn is_empty(&self) -> bool {
            self.files.lock().unwrap().is_empty()
        }

        /// Drop a file without recording it as removed
        pub fn discard(&self, path: &Path) {
            self.files.lock().unwrap().remove(path);
        }

        /// Every path passed to a successful `remove_file`, in order
        pub fn removed(&self) -> Vec<PathBuf> {
            self.removed.lock().unwrap().clone()
        }
    }

    impl ExistsFile for MemFs {
        fn exists(&self, path: &Path) -> bool {
            self.files.lock().unwrap().contains_key(path)
        }
    }

    impl RemoveFile for MemFs {
        fn remove_file(&self, path: &Path) -> io::Result<()> {
            match self.files.lock().unwrap().remove(path) {
                Some(_) => {
                    self.removed.lock().unwrap().push(path.to_path_buf());
                    Ok(())
                }
                None => Err(io::Error::new(io::ErrorKind::NotFound, "file not found")),
            }
        }
    }
}
