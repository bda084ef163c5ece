//! Local-folder artifact store.
//!
//! Images land in `images_dir` and are referenced as `<url_prefix>/<file>`;
//! labelled digest exports land in `summaries_dir`. Folders are created on
//! first write.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use taleweave_core::adapter::ImageData;
use taleweave_core::digest::ImageRef;
use taleweave_core::error::PersistenceError;
use taleweave_core::store::ArtifactStore;
use tracing::debug;

pub struct LocalArtifactStore {
    images_dir: PathBuf,
    summaries_dir: PathBuf,
    url_prefix: String,
}

impl LocalArtifactStore {
    pub fn new(
        images_dir: impl Into<PathBuf>,
        summaries_dir: impl Into<PathBuf>,
        url_prefix: impl Into<String>,
    ) -> Self {
        Self {
            images_dir: images_dir.into(),
            summaries_dir: summaries_dir.into(),
            url_prefix: url_prefix.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    pub fn summaries_dir(&self) -> &Path {
        &self.summaries_dir
    }

    async fn write(dir: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf, PersistenceError> {
        tokio::fs::create_dir_all(dir).await.map_err(|e| {
            PersistenceError::Export(format!("Failed to create {}: {e}", dir.display()))
        })?;
        let path = dir.join(file_name);
        tokio::fs::write(&path, bytes).await.map_err(|e| {
            PersistenceError::Export(format!("Failed to write {}: {e}", path.display()))
        })?;
        debug!(path = %path.display(), bytes = bytes.len(), "Artifact written");
        Ok(path)
    }
}

#[async_trait]
impl ArtifactStore for LocalArtifactStore {
    fn name(&self) -> &str {
        "local"
    }

    async fn save_image(&self, file_name: &str, image: &ImageData) -> Result<ImageRef, PersistenceError> {
        Self::write(&self.images_dir, file_name, &image.bytes).await?;
        let reference = if self.url_prefix.is_empty() {
            file_name.to_string()
        } else {
            format!("{}/{}", self.url_prefix, file_name)
        };
        Ok(ImageRef(reference))
    }

    async fn save_digest_text(&self, file_name: &str, text: &str) -> Result<PathBuf, PersistenceError> {
        Self::write(&self.summaries_dir, file_name, text.as_bytes()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn image_written_and_referenced_by_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let images = dir.path().join("static").join("images");
        let store = LocalArtifactStore::new(&images, dir.path().join("summaries"), "images/");

        let reference = store
            .save_image("tale_intro_m_20240101000000.png", &ImageData { bytes: vec![1, 2, 3] })
            .await
            .unwrap();

        assert_eq!(reference.as_str(), "images/tale_intro_m_20240101000000.png");
        let written = std::fs::read(images.join("tale_intro_m_20240101000000.png")).unwrap();
        assert_eq!(written, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn digest_text_written_to_summaries_dir() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalArtifactStore::new(dir.path().join("img"), dir.path().join("sum"), "images");

        let path = store.save_digest_text("tale_gpt_4_x.txt", "Giriş:\na\n\n").await.unwrap();
        assert_eq!(path, dir.path().join("sum").join("tale_gpt_4_x.txt"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "Giriş:\na\n\n");
    }

    #[tokio::test]
    async fn unwritable_folder_is_export_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"file, not a folder").unwrap();
        let store = LocalArtifactStore::new(blocker.join("img"), blocker.join("sum"), "images");

        let err = store.save_digest_text("x.txt", "x").await.unwrap_err();
        assert!(matches!(err, PersistenceError::Export(_)));
    }
}
