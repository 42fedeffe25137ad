//! Error type definitions for the ifypixels services
//!
//! Errors are structured per service so handlers can map each failure
//! category to its boundary message, while logs keep the underlying cause.

use thiserror::Error;

/// Errors raised while bootstrapping a service (configuration, listen
/// address). Request-scoped failures live in the per-service enums below.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O failures while reading or writing the configuration file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed
    #[error("Configuration parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Default configuration could not be serialized
    #[error("Configuration serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Listen address did not parse as `host:port`
    #[error("Invalid listen address: {0}")]
    Addr(#[from] std::net::AddrParseError),

    /// Anything else wrong with the configuration
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Background-removal request failures
#[derive(Error, Debug)]
pub enum RemovalError {
    /// Upload filename carries an extension outside {png, jpg, jpeg}
    #[error("unsupported upload extension: {extension:?}")]
    UnsupportedFormat { extension: String },

    /// Submission had no usable file field
    #[error("no file selected")]
    NoFileSelected,

    /// Multipart body could not be read
    #[error("upload could not be read: {message}")]
    Upload { message: String },

    /// Uploaded bytes did not decode as an image
    #[error("image decode failed: {0}")]
    Decode(#[source] image::ImageError),

    /// Cutout could not be encoded for storage
    #[error("cutout encode failed: {0}")]
    Encode(#[source] image::ImageError),

    /// Output file could not be written
    #[error("failed to store output: {0}")]
    Storage(#[from] std::io::Error),

    /// Blocking pixel-work task died
    #[error("removal task failed: {message}")]
    Task { message: String },

    /// Result page failed to render
    #[error("result page rendering failed: {0}")]
    Render(#[from] askama::Error),
}

/// Size-comparison request failures
///
/// The categories mirror the comparison service's recognized failure
/// conditions; everything outside them is `Unexpected`.
#[derive(Error, Debug)]
pub enum CompareError {
    #[error("payload exceeds the {max_bytes}-byte upload limit")]
    PayloadTooLarge { max_bytes: usize },

    #[error("multipart body could not be decoded: {message}")]
    MalformedBody { message: String },

    #[error("no image field in submission")]
    NoImageSelected,

    #[error("unrecognized image format")]
    UnrecognizedImage,

    #[error("file not found")]
    FileNotFound,

    #[error("insufficient permissions to access file")]
    PermissionDenied,

    #[error("recompression failed: {0}")]
    Recompress(#[source] image::ImageError),

    #[error("result page rendering failed: {0}")]
    Render(#[from] askama::Error),

    #[error("unexpected failure: {message}")]
    Unexpected { message: String },
}

/// Failures serving the static form pages
#[derive(Error, Debug)]
pub enum WebError {
    #[error("template rendering failed: {0}")]
    Template(#[from] askama::Error),
}

impl AppError {
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

impl RemovalError {
    pub fn unsupported_format<S: Into<String>>(extension: S) -> Self {
        Self::UnsupportedFormat {
            extension: extension.into(),
        }
    }

    pub fn upload<E: std::fmt::Display>(err: E) -> Self {
        Self::Upload {
            message: err.to_string(),
        }
    }

    pub fn task<S: Into<String>>(message: S) -> Self {
        Self::Task {
            message: message.into(),
        }
    }
}

impl CompareError {
    pub fn malformed_body<E: std::fmt::Display>(err: E) -> Self {
        Self::MalformedBody {
            message: err.to_string(),
        }
    }

    pub fn unexpected<S: Into<String>>(message: S) -> Self {
        Self::Unexpected {
            message: message.into(),
        }
    }

    /// Classify a decode failure: formats no decoder recognizes get their
    /// own category, everything else is unexpected.
    pub fn from_decode(err: image::ImageError) -> Self {
        match err {
            image::ImageError::Unsupported(_) => Self::UnrecognizedImage,
            other => Self::unexpected(format!("image decode failed: {other}")),
        }
    }
}

impl From<std::io::Error> for CompareError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::FileNotFound,
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            _ => Self::unexpected(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error as IoError, ErrorKind};

    #[test]
    fn io_errors_classify_into_recognized_categories() {
        let not_found = CompareError::from(IoError::new(ErrorKind::NotFound, "gone"));
        assert!(matches!(not_found, CompareError::FileNotFound));

        let denied = CompareError::from(IoError::new(ErrorKind::PermissionDenied, "nope"));
        assert!(matches!(denied, CompareError::PermissionDenied));

        let other = CompareError::from(IoError::new(ErrorKind::BrokenPipe, "pipe"));
        assert!(matches!(other, CompareError::Unexpected { .. }));
    }

    #[test]
    fn unknown_image_formats_classify_as_unrecognized() {
        let err = image::guess_format(b"definitely not an image").unwrap_err();
        assert!(matches!(
            CompareError::from_decode(err),
            CompareError::UnrecognizedImage
        ));
    }
}
