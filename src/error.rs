//! Upload failure taxonomy.

use classory_core::error::{ConfigError, SubmitError};
use thiserror::Error;

use crate::extract::ExtractError;

/// Why a document did not finish uploading.
///
/// Every variant names the document so callers can report or retry it.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("could not extract text from {document}: {source}")]
    Extraction {
        document: String,
        #[source]
        source: ExtractError,
    },

    #[error("{document} contains no text to upload")]
    EmptyContent { document: String },

    #[error("ingestion failed for batch starting at offset {offset} of document {document}")]
    BatchFailed {
        document: String,
        offset: usize,
        #[source]
        source: SubmitError,
    },

    #[error("upload of {document} cancelled before batch at offset {offset}")]
    Cancelled { document: String, offset: usize },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("could not record {document} as uploaded: {message}")]
    Store { document: String, message: String },
}

impl UploadError {
    /// Offset of the batch that failed, for batch-level failures.
    pub fn offset(&self) -> Option<usize> {
        match self {
            UploadError::BatchFailed { offset, .. } | UploadError::Cancelled { offset, .. } => {
                Some(*offset)
            }
            _ => None,
        }
    }
}
