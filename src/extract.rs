//! Plain-text extraction for uploaded files.
//!
//! Files arrive as bytes plus a content type; this module returns UTF-8 text
//! for the chunker. PDF parsing is delegated to `pdf-extract`. Plain text is
//! decoded lossily so a stray invalid byte never rejects a whole document.

use std::path::Path;

use thiserror::Error;

pub const MIME_PDF: &str = "application/pdf";
pub const MIME_TEXT: &str = "text/plain";

/// Text extraction failure. The document is reported as failed and never
/// reaches the chunker.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported content-type: {0}")]
    UnsupportedContentType(String),
    #[error("PDF extraction failed: {0}")]
    Pdf(String),
    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Guess the content type from a file extension. Anything that is not a
/// PDF is treated as plain text.
pub fn content_type_for_path(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("pdf") => MIME_PDF,
        _ => MIME_TEXT,
    }
}

/// Extract plain text from file content.
pub fn extract_text(bytes: &[u8], content_type: &str) -> Result<String, ExtractError> {
    match content_type {
        MIME_PDF => extract_pdf(bytes),
        MIME_TEXT => Ok(decode_text(bytes)),
        _ => Err(ExtractError::UnsupportedContentType(
            content_type.to_string(),
        )),
    }
}

/// Read a file and extract its text, inferring the content type from the
/// extension.
pub fn extract_file(path: &Path) -> Result<String, ExtractError> {
    let bytes = std::fs::read(path).map_err(|source| ExtractError::Io {
        path: path.display().to_string(),
        source,
    })?;
    extract_text(&bytes, content_type_for_path(path))
}

/// Lossy UTF-8 decode with a leading byte-order mark dropped.
fn decode_text(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text.into_owned(),
    }
}

fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractError> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractError::Pdf(e.to_string()))
}
