//! Background-removal handlers: upload form, submission, output download

use askama::Template;
use axum::extract::{Multipart, Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::Html;
use tracing::{error, info};

use crate::errors::{RemovalError, WebError};
use crate::removal;
use crate::storage;
use crate::utils::format_bytes;
use crate::web::pages::{ResultPage, UploadPage};
use crate::web::RemovalState;

pub async fn upload_form() -> Result<Html<String>, WebError> {
    Ok(Html(UploadPage.render()?))
}

pub async fn upload_image(
    State(state): State<RemovalState>,
    mut multipart: Multipart,
) -> Result<Html<String>, RemovalError> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await.map_err(RemovalError::upload)? {
        if field.name() == Some("image") {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let data = field.bytes().await.map_err(RemovalError::upload)?;
            upload = Some((file_name, data.to_vec()));
        }
    }

    let (file_name, data) = upload.ok_or(RemovalError::NoFileSelected)?;
    if file_name.is_empty() {
        return Err(RemovalError::NoFileSelected);
    }
    removal::validate_extension(&file_name)?;

    let cutout = state.service.remove_and_store(data).await?;
    info!("background removed: '{}' -> {}", file_name, cutout.file_name);

    let page = ResultPage {
        file_name: cutout.file_name,
        output_path: cutout.relative_path,
        file_size: format_bytes(cutout.file_size as u64),
        width: cutout.width,
        height: cutout.height,
    };
    Ok(Html(page.render()?))
}

/// Serves a stored output file. Registered for POST, matching the result
/// page's download form.
pub async fn download_output(
    State(state): State<RemovalState>,
    Path(file_name): Path<String>,
) -> Result<(HeaderMap, Vec<u8>), StatusCode> {
    let safe_name = match storage::sanitize_file_name(&file_name) {
        Some(name) => name,
        None => return Err(StatusCode::NOT_FOUND),
    };

    match state.storage.read_output(safe_name).await {
        Ok(data) => {
            let extension = safe_name.rsplit('.').next().unwrap_or_default();
            let mut headers = HeaderMap::new();
            headers.insert(
                header::CONTENT_TYPE,
                storage::mime_type_for_extension(extension)
                    .parse()
                    .unwrap_or_else(|_| "application/octet-stream".parse().unwrap()),
            );
            Ok((headers, data))
        }
        Err(e) => {
            error!("failed to read output file {}: {}", safe_name, e);
            Err(StatusCode::NOT_FOUND)
        }
    }
}
