use crate::extract::ExtractionError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;
use utoipa::ToSchema;

#[derive(ThisError, Debug)]
pub enum Error {
    /// The multipart body had no `file` part
    #[error("No file uploaded with key 'file'")]
    MissingFile,

    /// The `file` part carried a blank filename
    #[error("No selected file")]
    EmptyFilename,

    /// The filename extension is not one we can extract text from
    #[error("Unsupported file type: {extension}")]
    UnsupportedType { extension: String },

    /// The uploaded body exceeded the configured size limit
    #[error("File exceeds the maximum upload size of {limit} bytes")]
    PayloadTooLarge { limit: u64 },

    /// Malformed request data
    #[error("{message}")]
    BadRequest { message: String },

    /// The document library could not read the file
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// Anything else that went wrong while handling the upload
    #[error("Internal server error during processing: {0:#}")]
    Internal(#[from] anyhow::Error),
}

/// Body of every error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::MissingFile | Error::EmptyFilename | Error::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Error::UnsupportedType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Error::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Error::Extraction(_) | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match &self {
            Error::Internal(_) => {
                tracing::error!("Internal service error: {:#}", self);
            }
            Error::Extraction(_) => {
                tracing::warn!("Extraction failed: {}", self);
            }
            Error::PayloadTooLarge { .. } => {
                tracing::info!("Upload rejected: {}", self);
            }
            Error::MissingFile | Error::EmptyFilename | Error::UnsupportedType { .. } | Error::BadRequest { .. } => {
                tracing::debug!("Client error: {}", self);
            }
        }

        let status = self.status_code();
        let body = ErrorResponse { error: self.to_string() };
        (status, Json(body)).into_response()
    }
}

/// Type alias for handler results
pub type Result<T> = std::result::Result<T, Error>;
