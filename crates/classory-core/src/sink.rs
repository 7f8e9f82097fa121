//! The seam between the batch uploader and the ingestion service.

use async_trait::async_trait;

use crate::error::SubmitError;
use crate::models::IngestBatch;

/// Destination for chunk batches.
///
/// The uploader awaits each call before issuing the next, so an
/// implementation never sees two batches of the same document in flight.
#[async_trait]
pub trait BatchSink: Send + Sync {
    async fn submit_batch(&self, batch: &IngestBatch<'_>) -> Result<(), SubmitError>;
}
