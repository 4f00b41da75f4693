//! Text extraction from uploaded documents.
//!
//! Each supported format has its own extractor module:
//!
//! - [`pdf`]: page-by-page text via `lopdf`
//! - [`docx`]: body paragraphs read straight out of `word/document.xml`
//!
//! Extractors are synchronous and operate on a path on disk. Failures come back as an
//! [`ExtractionError`] whose message starts with `Error extracting ...`, which is the text
//! clients see in the 500 response.

pub mod docx;
pub mod pdf;

use std::fmt;
use std::path::Path;

use thiserror::Error;

use crate::errors::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Error extracting PDF text: {0}")]
    Pdf(String),

    #[error("Error extracting DOCX text: {0}")]
    Docx(String),
}

/// The document formats the service accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    /// Resolve the kind from an uploaded filename, ignoring case.
    ///
    /// The rejected extension is reported lower-cased with its leading dot, or empty when the
    /// filename has none.
    pub fn from_filename(filename: &str) -> Result<Self, Error> {
        let extension = extension_of(filename);
        match extension.as_str() {
            ".pdf" => Ok(DocumentKind::Pdf),
            ".docx" => Ok(DocumentKind::Docx),
            _ => Err(Error::UnsupportedType { extension }),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => ".pdf",
            DocumentKind::Docx => ".docx",
        }
    }

    /// Run the extractor for this kind against a file on disk.
    pub fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
        match self {
            DocumentKind::Pdf => pdf::extract_text(path),
            DocumentKind::Docx => docx::extract_text(path),
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::Pdf => write!(f, "pdf"),
            DocumentKind::Docx => write!(f, "docx"),
        }
    }
}

/// Lower-cased extension of the last path component, dot included.
///
/// Leading dots don't start an extension, so `.bashrc` has none.
fn extension_of(filename: &str) -> String {
    let lower = filename.to_lowercase();
    let base = lower.rsplit(['/', '\\']).next().unwrap_or("");
    let stem_start = base.len() - base.trim_start_matches('.').len();
    match base[stem_start..].rfind('.') {
        Some(idx) => base[stem_start + idx..].to_string(),
        None => String::new(),
    }
}
