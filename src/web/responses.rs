//! Error-to-response mapping for the plain-text boundary
//!
//! Failures leave the process as short human-readable texts; the structured
//! error (with its cause chain) only reaches the logs.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{error, warn};

use crate::errors::{CompareError, RemovalError, WebError};

pub const UNSUPPORTED_FORMAT_MESSAGE: &str =
    "Unsupported file format. Please upload PNG, JPG, or JPEG image.";
pub const NO_FILE_SELECTED_MESSAGE: &str = "No file selected!";
pub const REMOVAL_FAILED_MESSAGE: &str = "Error removing background! Check logs for details.";

pub const SIZE_LIMIT_MESSAGE: &str = "Error: File size exceeds 10MB limit!";
pub const DECODE_BODY_MESSAGE: &str = "Error: Could not decode uploaded data!";
pub const NO_IMAGE_SELECTED_MESSAGE: &str = "Error: No image selected!";
pub const FILE_NOT_FOUND_MESSAGE: &str = "Error: File not found!";
pub const PERMISSION_MESSAGE: &str = "Error: Insufficient permissions to access file!";
pub const UNSUPPORTED_IMAGE_MESSAGE: &str = "Error: Unsupported image format!";
pub const GENERIC_ERROR_MESSAGE: &str = "Error: An unexpected error occurred!";

impl IntoResponse for RemovalError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            RemovalError::UnsupportedFormat { .. } => {
                (StatusCode::BAD_REQUEST, UNSUPPORTED_FORMAT_MESSAGE)
            }
            RemovalError::NoFileSelected => (StatusCode::BAD_REQUEST, NO_FILE_SELECTED_MESSAGE),
            RemovalError::Upload { .. } | RemovalError::Decode(_) => {
                (StatusCode::BAD_REQUEST, REMOVAL_FAILED_MESSAGE)
            }
            RemovalError::Encode(_)
            | RemovalError::Storage(_)
            | RemovalError::Task { .. }
            | RemovalError::Render(_) => (StatusCode::INTERNAL_SERVER_ERROR, REMOVAL_FAILED_MESSAGE),
        };

        if status.is_server_error() {
            error!("background removal failed: {self}");
        } else {
            warn!("background removal rejected: {self}");
        }
        (status, message).into_response()
    }
}

impl IntoResponse for CompareError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            CompareError::PayloadTooLarge { .. } => {
                (StatusCode::PAYLOAD_TOO_LARGE, SIZE_LIMIT_MESSAGE)
            }
            CompareError::MalformedBody { .. } => (StatusCode::BAD_REQUEST, DECODE_BODY_MESSAGE),
            CompareError::NoImageSelected => (StatusCode::BAD_REQUEST, NO_IMAGE_SELECTED_MESSAGE),
            CompareError::UnrecognizedImage => {
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, UNSUPPORTED_IMAGE_MESSAGE)
            }
            CompareError::FileNotFound => (StatusCode::NOT_FOUND, FILE_NOT_FOUND_MESSAGE),
            CompareError::PermissionDenied => (StatusCode::FORBIDDEN, PERMISSION_MESSAGE),
            CompareError::Recompress(_)
            | CompareError::Render(_)
            | CompareError::Unexpected { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_ERROR_MESSAGE)
            }
        };

        if status.is_server_error() {
            error!("size comparison failed: {self}");
        } else {
            warn!("size comparison rejected: {self}");
        }
        (status, message).into_response()
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        error!("page rendering failed: {self}");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
    }
}
