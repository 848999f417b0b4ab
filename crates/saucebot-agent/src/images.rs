// SPDX-FileCopyrightText: 2026 Saucebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Temporary storage for downloaded photos while they are searched.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use saucebot_core::SauceError;
use saucebot_core::types::{ChatId, MessageId};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct ImageDir {
    root: PathBuf,
}

impl ImageDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/<chat_id>_<message_id>.jpg`
    pub fn path_for(&self, chat_id: ChatId, message_id: MessageId) -> PathBuf {
        self.root.join(format!("{}_{}.jpg", chat_id.0, message_id.0))
    }

    /// Writes `bytes` to `path`, creating the directory and replacing any existing file.
    pub async fn write(&self, path: &Path, bytes: &[u8]) -> Result<(), SauceError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| SauceError::Io {
                message: format!("cannot create photo directory {}", self.root.display()),
                source: e,
            })?;
        tokio::fs::write(path, bytes).await.map_err(|e| SauceError::Io {
            message: format!("cannot write photo {}", path.display()),
            source: e,
        })?;
        debug!(path = %path.display(), bytes = bytes.len(), "photo stored");
        Ok(())
    }

    /// Deletes `path`. A file that is already gone is fine.
    pub async fn remove(&self, path: &Path) {
        match tokio::fs::remove_file(path).await {
            Ok(()) => debug!(path = %path.display(), "photo removed"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(path = %path.display(), error = %e, "failed to remove photo"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_layout() {
        let dir = ImageDir::new("/tmp/photos");
        assert_eq!(
            dir.path_for(ChatId(-100), MessageId(7)),
            PathBuf::from("/tmp/photos/-100_7.jpg")
        );
    }

    #[tokio::test]
    async fn write_creates_directory_and_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = ImageDir::new(tmp.path().join("nested/photos"));
        let path = dir.path_for(ChatId(1), MessageId(2));

        dir.write(&path, b"first").await.unwrap();
        dir.write(&path, b"second").await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"second");
    }

    #[tokio::test]
    async fn remove_tolerates_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = ImageDir::new(tmp.path());
        let path = dir.path_for(ChatId(1), MessageId(2));

        dir.remove(&path).await;
        dir.write(&path, b"x").await.unwrap();
        dir.remove(&path).await;
        assert!(!path.exists());
        dir.remove(&path).await;
    }
}
