use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Multipart body accepted by `POST /extract-text` (documentation only)
#[derive(Debug, ToSchema)]
#[allow(unused)]
pub struct ExtractTextForm {
    /// A `.pdf` or `.docx` document
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

/// Successful extraction result
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ExtractTextResponse {
    /// Always "success"
    #[schema(example = "success")]
    pub status: String,
    /// Filename as uploaded
    #[schema(example = "resume.pdf")]
    pub filename: String,
    /// Document text with whitespace collapsed to single spaces
    #[schema(example = "Jane Doe Senior Engineer Skills: Rust, Go")]
    pub clean_text: String,
}

impl ExtractTextResponse {
    pub fn success(filename: String, clean_text: String) -> Self {
        Self {
            status: "success".to_string(),
            filename,
            clean_text,
        }
    }
}
