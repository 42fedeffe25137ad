//! Output-directory bookkeeping for background-removal results
//!
//! Outputs are written once under `<output_dir>/<uuid>.<ext>` and never
//! updated or deleted. Uniqueness comes from the random name, not from a
//! collision check.

use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

#[derive(Clone)]
pub struct OutputStorage {
    output_dir: PathBuf,
}

/// Bookkeeping for one freshly written output file.
#[derive(Debug, Clone)]
pub struct SavedFile {
    pub file_name: String,
    pub relative_path: String,
    pub file_size: i64,
}

impl OutputStorage {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub async fn ensure_output_dir(&self) -> Result<(), std::io::Error> {
        if !self.output_dir.exists() {
            fs::create_dir_all(&self.output_dir).await?;
        }
        Ok(())
    }

    pub async fn save_output(
        &self,
        data: Vec<u8>,
        id: Uuid,
        extension: &str,
    ) -> Result<SavedFile, std::io::Error> {
        self.ensure_output_dir().await?;

        let file_name = format!("{}.{}", id, extension);
        let relative_path = format!("uploads/remove/{}", file_name);
        let file_path = self.output_dir.join(&file_name);

        fs::write(&file_path, &data).await?;

        Ok(SavedFile {
            file_name,
            relative_path,
            file_size: data.len() as i64,
        })
    }

    /// Reads a previously stored output back. The name is re-checked here so
    /// no caller can escape the output directory.
    pub async fn read_output(&self, file_name: &str) -> Result<Vec<u8>, std::io::Error> {
        let safe_name = sanitize_file_name(file_name).ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "invalid output file name")
        })?;
        fs::read(self.output_dir.join(safe_name)).await
    }
}

/// Accepts plain file names only; anything that could traverse out of the
/// output directory is rejected.
pub fn sanitize_file_name(name: &str) -> Option<&str> {
    if name.is_empty() || name == "." || name == ".." {
        return None;
    }
    if name.contains('/') || name.contains('\\') {
        return None;
    }
    Some(name)
}

pub fn mime_type_for_extension(extension: &str) -> &'static str {
    match extension.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn saves_under_unique_names_and_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let storage = OutputStorage::new(dir.path().join("out"));

        let first = storage
            .save_output(b"first".to_vec(), Uuid::new_v4(), "png")
            .await
            .unwrap();
        let second = storage
            .save_output(b"second".to_vec(), Uuid::new_v4(), "png")
            .await
            .unwrap();

        assert_ne!(first.file_name, second.file_name);
        assert_eq!(first.file_size, 5);
        assert!(first.relative_path.starts_with("uploads/remove/"));

        let data = storage.read_output(&second.file_name).await.unwrap();
        assert_eq!(data, b"second");
    }

    #[tokio::test]
    async fn creates_the_output_directory_on_demand() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let storage = OutputStorage::new(nested.clone());

        assert!(!nested.exists());
        storage
            .save_output(b"data".to_vec(), Uuid::new_v4(), "png")
            .await
            .unwrap();
        assert!(nested.exists());
    }

    #[tokio::test]
    async fn rejects_traversal_in_read_path() {
        let dir = tempfile::tempdir().unwrap();
        let storage = OutputStorage::new(dir.path().to_path_buf());

        let err = storage.read_output("../secret.txt").await.unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }

    #[test]
    fn sanitize_rejects_path_like_names() {
        assert_eq!(sanitize_file_name("cutout.png"), Some("cutout.png"));
        assert!(sanitize_file_name("").is_none());
        assert!(sanitize_file_name(".").is_none());
        assert!(sanitize_file_name("..").is_none());
        assert!(sanitize_file_name("../x.png").is_none());
        assert!(sanitize_file_name("a/b.png").is_none());
        assert!(sanitize_file_name("a\\b.png").is_none());
    }

    #[test]
    fn mime_types_cover_the_served_formats() {
        assert_eq!(mime_type_for_extension("png"), "image/png");
        assert_eq!(mime_type_for_extension("JPG"), "image/jpeg");
        assert_eq!(mime_type_for_extension("jpeg"), "image/jpeg");
        assert_eq!(mime_type_for_extension("bin"), "application/octet-stream");
    }
}
