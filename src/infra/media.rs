//! Local media storage for portraits and business images.
//!
//! Stored paths are relative to the media root, e.g. `portraits/<id>.png`.

use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::config::{BUSINESS_IMAGE_DIR, DEFAULT_PORTRAIT, PORTRAIT_DIR};
use crate::errors::{AppError, AppResult};

/// File received from a multipart form
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct MediaStorage {
    root: PathBuf,
}

impl MediaStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write a portrait as `portraits/<account_id><ext>`, keeping the
    /// extension of the uploaded file name.
    pub async fn save_portrait(
        &self,
        account_id: Uuid,
        file_name: &str,
        bytes: &[u8],
    ) -> AppResult<String> {
        let relative = format!("{}/{}{}", PORTRAIT_DIR, account_id, extension_of(file_name));
        self.write(&relative, bytes).await?;
        Ok(relative)
    }

    /// Write a business image as `businesses/<business_id><ext>`.
    pub async fn save_business_image(
        &self,
        business_id: Uuid,
        file_name: &str,
        bytes: &[u8],
    ) -> AppResult<String> {
        let relative = format!(
            "{}/{}{}",
            BUSINESS_IMAGE_DIR,
            business_id,
            extension_of(file_name)
        );
        self.write(&relative, bytes).await?;
        Ok(relative)
    }

    /// Remove a stored file. The default portrait and missing files are skipped.
    pub async fn remove(&self, relative: &str) -> AppResult<()> {
        if relative.is_empty() || relative == DEFAULT_PORTRAIT {
            return Ok(());
        }

        let Some(path) = self.resolve(relative) else {
            return Ok(());
        };

        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::internal(format!(
                "Failed to remove {}: {}",
                path.display(),
                e
            ))),
        }
    }

    /// Does `relative` name an existing file under the media root?
    pub async fn exists(&self, relative: &str) -> bool {
        match self.resolve(relative) {
            Some(path) => tokio::fs::metadata(path)
                .await
                .map(|m| m.is_file())
                .unwrap_or(false),
            None => false,
        }
    }

    async fn write(&self, relative: &str, bytes: &[u8]) -> AppResult<()> {
        let path = self
            .resolve(relative)
            .ok_or_else(|| AppError::invalid_input("Invalid file path"))?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::internal(format!("Failed to create media dir: {}", e)))?;
        }

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| AppError::internal(format!("Failed to write {}: {}", path.display(), e)))?;

        tracing::debug!(path = %path.display(), size = bytes.len(), "Media file stored");
        Ok(())
    }

    /// Join `relative` onto the root, refusing absolute paths and `..`.
    fn resolve(&self, relative: &str) -> Option<PathBuf> {
        let candidate = Path::new(relative);
        let safe = candidate
            .components()
            .all(|c| matches!(c, std::path::Component::Normal(_)));
        if !safe || relative.is_empty() {
            return None;
        }
        Some(self.root.join(candidate))
    }
}

/// Extension of an uploaded file name including the dot, or "".
fn extension_of(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|e| format!(".{}", e.to_ascii_lowercase()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("me.PNG"), ".png");
        assert_eq!(extension_of("archive.tar.gz"), ".gz");
        assert_eq!(extension_of("noext"), "");
        assert_eq!(extension_of("bad.p/g"), "");
    }

    #[tokio::test]
    async fn test_save_and_replace_portrait() {
        let dir = tempfile::tempdir().unwrap();
        let storage = MediaStorage::new(dir.path());
        let id = Uuid::new_v4();

        let path = storage.save_portrait(id, "face.jpg", b"jpeg").await.unwrap();
        assert_eq!(path, format!("portraits/{}.jpg", id));
        assert!(storage.exists(&path).await);

        storage.remove(&path).await.unwrap();
        assert!(!storage.exists(&path).await);
    }

    #[tokio::test]
    async fn test_default_portrait_is_never_removed() {
        let dir = tempfile::tempdir().unwrap();
        let storage = MediaStorage::new(dir.path());
        let default = dir.path().join(DEFAULT_PORTRAIT);
        std::fs::create_dir_all(default.parent().unwrap()).unwrap();
        std::fs::write(&default, b"png").unwrap();

        storage.remove(DEFAULT_PORTRAIT).await.unwrap();
        assert!(default.exists());
    }

    #[tokio::test]
    async fn test_paths_outside_root_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let storage = MediaStorage::new(dir.path());

        assert!(!storage.exists("../etc/passwd").await);
        assert!(!storage.exists("/etc/passwd").await);
        assert!(storage.remove("../x").await.is_ok());
    }
}
