//! Size-comparison handlers: upload form and submission

use askama::Template;
use axum::extract::{Multipart, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::Html;
use base64::Engine as _;
use tracing::info;

use crate::errors::{CompareError, WebError};
use crate::models::CompareReport;
use crate::utils::format_bytes;
use crate::web::pages::{ComparePage, CompareResultPage};
use crate::web::CompareState;

pub async fn compare_form() -> Result<Html<String>, WebError> {
    Ok(Html(ComparePage.render()?))
}

pub async fn compare_image(
    State(state): State<CompareState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Html<String>, CompareError> {
    // Declared size is checked up front so an oversized upload never reaches
    // the decoder; the router's body limit backstops length-less bodies.
    if let Some(declared) = declared_content_length(&headers) {
        if declared > state.max_upload_bytes as u64 {
            return Err(CompareError::PayloadTooLarge {
                max_bytes: state.max_upload_bytes,
            });
        }
    }

    let data = read_image_field(multipart, state.max_upload_bytes).await?;

    let service = state.service.clone();
    let report = tokio::task::spawn_blocking(move || service.recompress(&data))
        .await
        .map_err(|e| CompareError::unexpected(e.to_string()))??;

    info!(
        "comparison finished: {} -> {} bytes ({:.1}% saved)",
        report.original_size,
        report.recompressed_size,
        report.saved_percent()
    );

    render_report(report)
}

fn declared_content_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(header::CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

async fn read_image_field(
    mut multipart: Multipart,
    max_upload_bytes: usize,
) -> Result<Vec<u8>, CompareError> {
    let mut data: Option<Vec<u8>> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                return Err(CompareError::PayloadTooLarge {
                    max_bytes: max_upload_bytes,
                })
            }
            Err(e) => return Err(CompareError::malformed_body(e)),
        };

        if field.name() == Some("image") {
            let bytes = match field.bytes().await {
                Ok(bytes) => bytes,
                Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                    return Err(CompareError::PayloadTooLarge {
                        max_bytes: max_upload_bytes,
                    })
                }
                Err(e) => return Err(CompareError::malformed_body(e)),
            };
            if !bytes.is_empty() {
                data = Some(bytes.to_vec());
            }
        }
    }

    data.ok_or(CompareError::NoImageSelected)
}

fn render_report(report: CompareReport) -> Result<Html<String>, CompareError> {
    let encoded = base64::engine::general_purpose::STANDARD.encode(&report.recompressed);
    let page = CompareResultPage {
        original_size: report.original_size,
        recompressed_size: report.recompressed_size,
        original_human: format_bytes(report.original_size),
        recompressed_human: format_bytes(report.recompressed_size),
        saved_percent: format!("{:.1}%", report.saved_percent()),
        preview_uri: format!("data:image/{};base64,{}", report.format, encoded),
        download_name: format!("compressed.{}", report.format),
    };
    Ok(Html(page.render()?))
}
