//! Askama page templates

use askama::Template;

#[derive(Template)]
#[template(path = "upload.html")]
pub struct UploadPage;

#[derive(Template)]
#[template(path = "result.html")]
pub struct ResultPage {
    pub file_name: String,
    pub output_path: String,
    pub file_size: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Template)]
#[template(path = "compare.html")]
pub struct ComparePage;

#[derive(Template)]
#[template(path = "compare_result.html")]
pub struct CompareResultPage {
    pub original_size: u64,
    pub recompressed_size: u64,
    pub original_human: String,
    pub recompressed_human: String,
    pub saved_percent: String,
    pub preview_uri: String,
    pub download_name: String,
}
