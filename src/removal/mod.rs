//! Background-removal service
//!
//! One upload in, one stored cutout out: decode, matte, encode as PNG (the
//! displayable normalization of an alpha image), persist under a fresh UUID
//! name.

pub mod engine;

pub use engine::{MatteEngine, MatteOptions};

use std::io::Cursor;

use image::ImageFormat;
use tracing::info;
use uuid::Uuid;

use crate::errors::RemovalError;
use crate::models::StoredCutout;
use crate::storage::OutputStorage;

const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Validates the upload filename against the accepted extension set,
/// returning the lowercased extension.
pub fn validate_extension(file_name: &str) -> Result<String, RemovalError> {
    let extension = std::path::Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();

    if ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        Ok(extension)
    } else {
        Err(RemovalError::unsupported_format(extension))
    }
}

#[derive(Clone)]
pub struct RemovalService {
    engine: MatteEngine,
    storage: OutputStorage,
}

impl RemovalService {
    pub fn new(engine: MatteEngine, storage: OutputStorage) -> Self {
        Self { engine, storage }
    }

    /// Runs the matte over one upload and persists the cutout.
    ///
    /// Pixel work happens on the blocking pool; nothing is written unless
    /// decode, matte and encode all succeed, so a failed request leaves the
    /// output directory untouched.
    pub async fn remove_and_store(&self, data: Vec<u8>) -> Result<StoredCutout, RemovalError> {
        let engine = self.engine.clone();
        let (encoded, width, height) =
            tokio::task::spawn_blocking(move || -> Result<(Vec<u8>, u32, u32), RemovalError> {
                let decoded = image::load_from_memory(&data).map_err(RemovalError::Decode)?;
                let cutout = engine.remove_background(&decoded.to_rgba8());
                let (width, height) = cutout.dimensions();

                let mut encoded = Vec::new();
                image::DynamicImage::ImageRgba8(cutout)
                    .write_to(&mut Cursor::new(&mut encoded), ImageFormat::Png)
                    .map_err(RemovalError::Encode)?;
                Ok((encoded, width, height))
            })
            .await
            .map_err(|e| RemovalError::task(e.to_string()))??;

        let id = Uuid::new_v4();
        let saved = self.storage.save_output(encoded, id, "png").await?;

        info!(
            "stored cutout {} ({} bytes, {}x{})",
            saved.file_name, saved.file_size, width, height
        );

        Ok(StoredCutout {
            id,
            file_name: saved.file_name,
            relative_path: saved.relative_path,
            file_size: saved.file_size,
            mime_type: "image/png".to_string(),
            width,
            height,
            created_at: chrono::Utc::now(),
        })
    }
}
