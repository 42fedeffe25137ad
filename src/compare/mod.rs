//! Lossy recompression for the size-comparison service
//!
//! Every upload is re-encoded as JPEG at a fixed reduced quality; the report
//! pairs the original and recompressed byte counts and carries the new bytes
//! for the inline preview. Nothing here touches the filesystem.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;

use crate::errors::CompareError;
use crate::models::CompareReport;

#[derive(Debug, Clone)]
pub struct CompareService {
    jpeg_quality: u8,
}

impl CompareService {
    pub fn new(jpeg_quality: u8) -> Self {
        Self { jpeg_quality }
    }

    pub fn recompress(&self, original: &[u8]) -> Result<CompareReport, CompareError> {
        let reader = image::io::Reader::new(Cursor::new(original)).with_guessed_format()?;
        if reader.format().is_none() {
            return Err(CompareError::UnrecognizedImage);
        }
        let decoded = reader.decode().map_err(CompareError::from_decode)?;

        // JPEG carries no alpha channel.
        let rgb = decoded.to_rgb8();
        let mut recompressed = Vec::new();
        let mut encoder = JpegEncoder::new_with_quality(&mut recompressed, self.jpeg_quality);
        encoder
            .encode_image(&rgb)
            .map_err(CompareError::Recompress)?;

        Ok(CompareReport {
            original_size: original.len() as u64,
            recompressed_size: recompressed.len() as u64,
            format: "jpeg".to_string(),
            recompressed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};

    /// Deterministic per-pixel noise; compresses badly as PNG, well as JPEG.
    fn noisy_photo() -> RgbImage {
        let mut seed: u32 = 0x2468_ace1;
        RgbImage::from_fn(256, 256, |_, _| {
            seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            let bytes = seed.to_be_bytes();
            Rgb([bytes[0], bytes[1], bytes[2]])
        })
    }

    fn encode(image: &RgbImage, format: ImageFormat) -> Vec<u8> {
        let mut out = Vec::new();
        image::DynamicImage::ImageRgb8(image.clone())
            .write_to(&mut Cursor::new(&mut out), format)
            .unwrap();
        out
    }

    #[test]
    fn reduced_quality_shrinks_photographic_input() {
        let original = encode(&noisy_photo(), ImageFormat::Png);
        let report = CompareService::new(50).recompress(&original).unwrap();

        assert_eq!(report.original_size, original.len() as u64);
        assert!(report.recompressed_size <= report.original_size);
        assert_eq!(report.format, "jpeg");
        assert!(report.saved_percent() > 0.0);
    }

    #[test]
    fn recompressed_bytes_decode_as_jpeg() {
        let original = encode(&noisy_photo(), ImageFormat::Png);
        let report = CompareService::new(50).recompress(&original).unwrap();

        assert_eq!(
            image::guess_format(&report.recompressed).unwrap(),
            ImageFormat::Jpeg
        );
        let decoded = image::load_from_memory(&report.recompressed).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (256, 256));
    }

    #[test]
    fn lower_quality_means_smaller_output() {
        let original = encode(&noisy_photo(), ImageFormat::Png);
        let low = CompareService::new(10).recompress(&original).unwrap();
        let high = CompareService::new(90).recompress(&original).unwrap();
        assert!(low.recompressed_size < high.recompressed_size);
    }

    #[test]
    fn unrecognized_bytes_are_rejected() {
        let err = CompareService::new(50)
            .recompress(b"plain text, not pixels")
            .unwrap_err();
        assert!(matches!(err, CompareError::UnrecognizedImage));
    }
}
