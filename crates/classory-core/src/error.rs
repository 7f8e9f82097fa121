//! Error types shared by the chunking and batching layers.

use thiserror::Error;

/// Invalid chunking or batching parameters.
///
/// These are configuration mistakes and are reported when a
/// [`ChunkConfig`](crate::chunk::ChunkConfig) or batch plan is built,
/// never in the middle of an upload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("chunk size must be > 0")]
    ChunkSizeZero,
    #[error("overlap ({overlap}) must be smaller than chunk size ({chunk_size})")]
    OverlapTooLarge { overlap: usize, chunk_size: usize },
    #[error("batch size must be > 0")]
    BatchSizeZero,
    #[error("unknown chunking preset: '{0}'. Must be long-form or compact.")]
    UnknownPreset(String),
}

/// A single batch submission that did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// The ingestion endpoint answered with a non-success status.
    #[error("ingestion endpoint returned {status}: {body}")]
    Status { status: u16, body: String },
    /// The request never produced a response (connect error, timeout, ...).
    #[error("transport error: {0}")]
    Transport(String),
}
