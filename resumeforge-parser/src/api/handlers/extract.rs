//! Document upload and text extraction.

use std::io::Write;
use std::path::Path;

use anyhow::Context;
use axum::{
    Json,
    extract::{
        Multipart, State,
        multipart::{MultipartError, MultipartRejection},
    },
    http::StatusCode,
};
use tempfile::NamedTempFile;

use crate::AppState;
use crate::api::models::extract::{ExtractTextForm, ExtractTextResponse};
use crate::errors::{Error, ErrorResponse, Result};
use crate::extract::DocumentKind;
use crate::normalize::clean_text;

/// The `file` part of an upload.
struct Upload {
    filename: String,
    bytes: Vec<u8>,
}

#[utoipa::path(
    post,
    path = "/extract-text",
    tag = "extraction",
    summary = "Extract text",
    description = "Upload a PDF or DOCX document in the multipart field `file` and get its text back with whitespace collapsed to single spaces.

The extension check is case-insensitive. The upload is written to a temporary file for the duration of the request only.",
    request_body(
        content = ExtractTextForm,
        content_type = "multipart/form-data",
        description = "The document to extract text from"
    ),
    responses(
        (status = 200, description = "Text extracted", body = ExtractTextResponse),
        (status = 400, description = "No `file` part, or the file has no name", body = ErrorResponse),
        (status = 413, description = "Upload larger than the configured limit", body = ErrorResponse),
        (status = 415, description = "Extension other than .pdf or .docx", body = ErrorResponse),
        (status = 500, description = "The document could not be read, or processing failed", body = ErrorResponse),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn extract_text(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<ExtractTextResponse>> {
    // A body that isn't multipart can't carry a file part
    let multipart = multipart.map_err(|rejection| {
        tracing::debug!(%rejection, "Request body is not multipart/form-data");
        Error::MissingFile
    })?;

    let Upload { filename, bytes } = receive_file(multipart, state.config.uploads.max_file_size).await?;
    if filename.is_empty() {
        return Err(Error::EmptyFilename);
    }

    let kind = DocumentKind::from_filename(&filename)?;

    tracing::info!(
        filename = %filename,
        kind = %kind,
        size = bytes.len(),
        "Extracting text from upload"
    );

    // Library parse calls are blocking. The scratch file is owned by this closure and removed
    // when it drops, including on panic.
    let scratch_dir = state.config.scratch_dir();
    let raw_text = tokio::task::spawn_blocking(move || -> Result<String> {
        let scratch = persist_temp(&bytes, kind, &scratch_dir)?;
        Ok(kind.extract(scratch.path())?)
    })
    .await
    .map_err(|e| Error::Internal(anyhow::anyhow!("extraction task failed: {e}")))??;

    let clean = clean_text(&raw_text);

    tracing::info!(
        filename = %filename,
        raw_chars = raw_text.len(),
        clean_chars = clean.len(),
        "Extraction complete"
    );

    Ok(Json(ExtractTextResponse::success(filename, clean)))
}

/// Find the first `file` part that carries a filename and read it fully.
///
/// A `file` part without a filename is an ordinary form field, not an upload.
async fn receive_file(mut multipart: Multipart, max_file_size: u64) -> Result<Upload> {
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_file_size))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };

        // The limit applies to the file contents, not the multipart framing around them
        let mut bytes = Vec::new();
        while let Some(chunk) = field.chunk().await.map_err(|e| multipart_error(e, max_file_size))? {
            if (bytes.len() + chunk.len()) as u64 > max_file_size {
                return Err(Error::PayloadTooLarge { limit: max_file_size });
            }
            bytes.extend_from_slice(&chunk);
        }
        return Ok(Upload { filename, bytes });
    }

    Err(Error::MissingFile)
}

fn multipart_error(e: MultipartError, max_file_size: u64) -> Error {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        Error::PayloadTooLarge { limit: max_file_size }
    } else {
        Error::BadRequest {
            message: format!("Failed to parse multipart data: {}", e.body_text()),
        }
    }
}

/// Write the upload to a uniquely named file in `dir` that is deleted when the handle drops.
fn persist_temp(bytes: &[u8], kind: DocumentKind, dir: &Path) -> anyhow::Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("rfparse-")
        .suffix(kind.extension())
        .tempfile_in(dir)
        .context("create temporary upload file")?;

    file.write_all(bytes).context("write upload to temporary file")?;
    file.flush().context("flush temporary upload file")?;

    Ok(file)
}
