//! Batch planning and upload progress accounting.
//!
//! A chunk sequence is submitted to the ingestion endpoint in consecutive
//! slices of at most `batch_size` chunks. Each slice carries the index of
//! its first chunk (`start_chunk_number`) so the service can store chunks
//! from separate submissions in document order.

use crate::error::ConfigError;

/// A contiguous slice of a document's chunk sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Batch<'a> {
    /// Index of `chunks[0]` within the full sequence.
    pub start_chunk_number: usize,
    pub chunks: &'a [String],
}

/// Partition `chunks` into batches of at most `batch_size`, preserving order.
///
/// Produces `ceil(len / batch_size)` batches; an empty sequence yields none.
pub fn plan_batches(chunks: &[String], batch_size: usize) -> Result<Vec<Batch<'_>>, ConfigError> {
    if batch_size == 0 {
        return Err(ConfigError::BatchSizeZero);
    }
    Ok(chunks
        .chunks(batch_size)
        .enumerate()
        .map(|(i, slice)| Batch {
            start_chunk_number: i * batch_size,
            chunks: slice,
        })
        .collect())
}

/// Progress percentage after the batch starting at `batch_start` succeeded.
///
/// `min(100, round((batch_start + batch_size) / total_chunks * 100))`. The
/// final partial batch overshoots before the clamp, so 100 is reached
/// exactly when the last batch completes.
pub fn progress_after(batch_start: usize, batch_size: usize, total_chunks: usize) -> u8 {
    if total_chunks == 0 {
        return 100;
    }
    let ratio = (batch_start + batch_size) as f64 / total_chunks as f64;
    (ratio * 100.0).round().min(100.0) as u8
}
