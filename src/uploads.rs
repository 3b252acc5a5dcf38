//! Storage of uploaded files (payment proofs, QRIS images, menu photos,
//! avatars).
//!
//! Files land under `<upload_dir>/<category>/<uuid>.<ext>` and are served
//! from `/uploads/<category>/<filename>`. A [`StoredFile`] deletes its file
//! on drop unless [`StoredFile::keep`] was called, so any failure between
//! upload and database commit leaves no orphaned file behind.

use std::path::PathBuf;

use anyhow::{Context, Result};
use uuid::Uuid;

pub const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "pdf"];
pub const MAX_FILE_BYTES: usize = 5 * 1024 * 1024;

/// Validate an upload before any I/O. Returns the normalized extension.
pub fn validate(original_name: &str, size: usize) -> Result<String, String> {
    if size == 0 {
        return Err("uploaded file is empty".to_string());
    }
    if size > MAX_FILE_BYTES {
        return Err(format!(
            "uploaded file exceeds the {} MB limit",
            MAX_FILE_BYTES / (1024 * 1024)
        ));
    }
    let ext = original_name
        .rsplit_once('.')
        .map(|(_, e)| e.to_ascii_lowercase())
        .unwrap_or_default();
    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(format!(
            "file type not allowed (expected one of: {})",
            ALLOWED_EXTENSIONS.join(", ")
        ));
    }
    Ok(ext)
}

/// A file written to permanent storage, deleted on drop unless kept
pub struct StoredFile {
    abs_path: PathBuf,
    rel_path: String,
    committed: bool,
}

impl StoredFile {
    /// Path relative to the upload root, e.g. "payment-proofs/<uuid>.jpg"
    pub fn rel_path(&self) -> &str {
        &self.rel_path
    }

    /// Commit the file: it will no longer be deleted on drop
    pub fn keep(mut self) -> String {
        self.committed = true;
        self.rel_path.clone()
    }
}

impl Drop for StoredFile {
    fn drop(&mut self) {
        if !self.committed {
            if let Err(e) = std::fs::remove_file(&self.abs_path) {
                tracing::warn!("failed to remove orphaned upload {}: {}", self.rel_path, e);
            } else {
                tracing::debug!("removed orphaned upload {}", self.rel_path);
            }
        }
    }
}

/// Write uploaded bytes under `<upload_dir>/<category>/` with a fresh
/// UUID filename. Call [`validate`] first; this only performs I/O.
pub async fn store(
    upload_dir: &str,
    category: &str,
    ext: &str,
    data: &[u8],
) -> Result<StoredFile> {
    let dir = PathBuf::from(upload_dir).join(category);
    tokio::fs::create_dir_all(&dir)
        .await
        .with_context(|| format!("failed to create upload directory {}", dir.display()))?;

    let filename = format!("{}.{}", Uuid::new_v4(), ext);
    let abs_path = dir.join(&filename);
    tokio::fs::write(&abs_path, data)
        .await
        .with_context(|| format!("failed to write upload {}", abs_path.display()))?;

    Ok(StoredFile {
        abs_path,
        rel_path: format!("{}/{}", category, filename),
        committed: false,
    })
}

/// Absolute URL for a stored file, built from the configured base URL
pub fn public_url(base_url: &str, rel_path: &str) -> String {
    format!("{}/uploads/{}", base_url.trim_end_matches('/'), rel_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_extension() {
        assert_eq!(validate("bukti.JPG", 100).unwrap(), "jpg");
        assert_eq!(validate("proof.png", 100).unwrap(), "png");
        assert!(validate("malware.exe", 100).is_err());
        assert!(validate("no-extension", 100).is_err());
    }

    #[test]
    fn test_validate_size() {
        assert!(validate("a.jpg", 0).is_err());
        assert!(validate("a.jpg", MAX_FILE_BYTES + 1).is_err());
        assert!(validate("a.jpg", MAX_FILE_BYTES).is_ok());
    }

    #[test]
    fn test_public_url() {
        assert_eq!(
            public_url("http://localhost:8080/", "payment-proofs/x.jpg"),
            "http://localhost:8080/uploads/payment-proofs/x.jpg"
        );
    }

    #[tokio::test]
    async fn test_drop_deletes_unkept_file() {
        let dir = std::env::temp_dir().join(format!("kost-uploads-{}", Uuid::new_v4()));
        let dir_str = dir.to_str().unwrap().to_string();

        let stored = store(&dir_str, "payment-proofs", "jpg", b"fake-image").await.unwrap();
        let abs = dir.join(stored.rel_path());
        assert!(abs.exists());
        drop(stored);
        assert!(!abs.exists());

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn test_keep_preserves_file() {
        let dir = std::env::temp_dir().join(format!("kost-uploads-{}", Uuid::new_v4()));
        let dir_str = dir.to_str().unwrap().to_string();

        let stored = store(&dir_str, "payment-proofs", "png", b"fake-image").await.unwrap();
        let rel = stored.keep();
        let abs = dir.join(&rel);
        assert!(abs.exists());

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
