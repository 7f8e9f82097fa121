//! Batched ingestion pipeline.
//!
//! Coordinates the upload flow for each document: text extraction →
//! word-window chunking → sequential batch submission → recording the
//! document as known and active.
//!
//! Batches of one document are submitted strictly one after another; the
//! next batch is only sent once the previous submission has completed. The
//! first failed batch aborts the document. Documents are processed in the
//! order given, and a failed document does not stop the ones after it.

use std::path::{Path, PathBuf};

use classory_core::batch::{plan_batches, progress_after};
use classory_core::chunk::{chunk_text, normalize_document_name, ChunkConfig};
use classory_core::models::IngestBatch;
use classory_core::sink::BatchSink;
use classory_core::store::DocumentStore;
use tokio_util::sync::CancellationToken;

use crate::error::UploadError;
use crate::extract::{self, ExtractError};
use crate::progress::{UploadEvent, UploadProgressReporter};

/// Chunking and batching parameters for one upload run.
#[derive(Debug, Clone, Copy)]
pub struct UploadOptions {
    pub chunking: ChunkConfig,
    pub batch_size: usize,
}

/// Result of a document whose every batch was accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSummary {
    /// Normalized name the chunks were stored under.
    pub document: String,
    pub chunks: usize,
    pub batches: usize,
}

/// Where a document's content comes from.
#[derive(Debug, Clone)]
pub enum DocumentContent {
    File(PathBuf),
    Bytes {
        bytes: Vec<u8>,
        content_type: String,
    },
}

/// A document queued for upload, named by its original file name.
#[derive(Debug, Clone)]
pub struct DocumentInput {
    pub name: String,
    pub content: DocumentContent,
}

impl DocumentInput {
    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            name,
            content: DocumentContent::File(path.to_path_buf()),
        }
    }

    pub fn from_text(name: &str, text: &str) -> Self {
        Self {
            name: name.to_string(),
            content: DocumentContent::Bytes {
                bytes: text.as_bytes().to_vec(),
                content_type: extract::MIME_TEXT.to_string(),
            },
        }
    }

    fn extract(&self) -> Result<String, ExtractError> {
        match &self.content {
            DocumentContent::File(path) => extract::extract_file(path),
            DocumentContent::Bytes {
                bytes,
                content_type,
            } => extract::extract_text(bytes, content_type),
        }
    }
}

/// Outcome of one document in a multi-document run.
#[derive(Debug)]
pub struct DocumentReport {
    /// Normalized document name.
    pub document: String,
    pub result: Result<UploadSummary, UploadError>,
}

/// A chunked document that has not been submitted yet.
#[derive(Debug, Clone)]
pub struct PreparedDocument {
    pub document: String,
    pub chunks: Vec<String>,
}

impl PreparedDocument {
    pub fn batch_count(&self, batch_size: usize) -> usize {
        self.chunks.len().div_ceil(batch_size.max(1))
    }
}

/// Extract and chunk a document without contacting the ingestion service.
pub fn prepare_document(
    input: &DocumentInput,
    chunking: &ChunkConfig,
) -> Result<PreparedDocument, UploadError> {
    let document = normalize_document_name(&input.name);

    let text = input
        .extract()
        .map_err(|source| UploadError::Extraction {
            document: document.clone(),
            source,
        })?;

    let chunks = chunk_text(&text, chunking);
    if chunks.iter().all(String::is_empty) {
        return Err(UploadError::EmptyContent { document });
    }

    Ok(PreparedDocument { document, chunks })
}

/// Submit one document's chunks in batches of `batch_size`.
///
/// Progress is reported after every accepted batch. On the first failure
/// nothing further is submitted and the error carries the failed batch's
/// offset. Batches already accepted are not rolled back.
pub async fn upload_chunks(
    sink: &dyn BatchSink,
    document_name: &str,
    chunks: &[String],
    batch_size: usize,
    reporter: &dyn UploadProgressReporter,
    cancel: &CancellationToken,
) -> Result<UploadSummary, UploadError> {
    let document = normalize_document_name(document_name);
    let batches = plan_batches(chunks, batch_size)?;
    let total_chunks = chunks.len();

    for batch in &batches {
        let offset = batch.start_chunk_number;
        if cancel.is_cancelled() {
            return Err(UploadError::Cancelled { document, offset });
        }

        let request = IngestBatch::new(&document, batch);
        let submitted = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Err(UploadError::Cancelled {
                    document: document.clone(),
                    offset,
                });
            }
            result = sink.submit_batch(&request) => result,
        };

        if let Err(source) = submitted {
            tracing::warn!(document = %document, offset, error = %source, "batch rejected");
            return Err(UploadError::BatchFailed {
                document,
                offset,
                source,
            });
        }

        let percent = progress_after(offset, batch_size, total_chunks);
        tracing::debug!(document = %document, offset, percent, "batch accepted");
        reporter.report(UploadEvent::Batch {
            document: document.clone(),
            start_chunk_number: offset,
            total_chunks,
            percent,
        });
    }

    Ok(UploadSummary {
        document,
        chunks: total_chunks,
        batches: batches.len(),
    })
}

/// Upload several documents one at a time, in order.
///
/// Each successful document is added to `store` and becomes the active
/// document. A failure is reported and the run moves on to the next
/// document; cancellation marks every remaining document as cancelled.
pub async fn upload_documents(
    inputs: &[DocumentInput],
    options: &UploadOptions,
    sink: &dyn BatchSink,
    store: &dyn DocumentStore,
    reporter: &dyn UploadProgressReporter,
    cancel: &CancellationToken,
) -> Vec<DocumentReport> {
    let mut reports = Vec::with_capacity(inputs.len());

    for input in inputs {
        let document = normalize_document_name(&input.name);

        let result = if cancel.is_cancelled() {
            Err(UploadError::Cancelled {
                document: document.clone(),
                offset: 0,
            })
        } else {
            upload_one(input, options, sink, store, reporter, cancel).await
        };

        match &result {
            Ok(summary) => reporter.report(UploadEvent::Completed {
                document: document.clone(),
                chunks: summary.chunks,
            }),
            Err(e) => {
                tracing::warn!(document = %document, error = %e, "document upload failed");
                reporter.report(UploadEvent::Failed {
                    document: document.clone(),
                    reason: e.to_string(),
                });
            }
        }

        reports.push(DocumentReport { document, result });
    }

    reports
}

async fn upload_one(
    input: &DocumentInput,
    options: &UploadOptions,
    sink: &dyn BatchSink,
    store: &dyn DocumentStore,
    reporter: &dyn UploadProgressReporter,
    cancel: &CancellationToken,
) -> Result<UploadSummary, UploadError> {
    reporter.report(UploadEvent::Parsing {
        document: normalize_document_name(&input.name),
    });

    let prepared = prepare_document(input, &options.chunking)?;
    let summary = upload_chunks(
        sink,
        &prepared.document,
        &prepared.chunks,
        options.batch_size,
        reporter,
        cancel,
    )
    .await?;

    let store_err = |e: anyhow::Error| UploadError::Store {
        document: summary.document.clone(),
        message: format!("{:#}", e),
    };
    store.add(&summary.document).await.map_err(store_err)?;
    store.set_active(&summary.document).await.map_err(store_err)?;

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use classory_core::error::SubmitError;
    use classory_core::store::memory::InMemoryDocumentStore;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Submitted {
        file_name: String,
        start: usize,
        chunks: Vec<String>,
    }

    type FailWhen = Box<dyn Fn(&IngestBatch<'_>) -> bool + Send + Sync>;

    struct RecordingSink {
        submitted: Mutex<Vec<Submitted>>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        fail_when: FailWhen,
        cancel_after_first: Option<CancellationToken>,
    }

    impl RecordingSink {
        fn new() -> Self {
            Self::failing(Box::new(|_: &IngestBatch<'_>| false))
        }

        fn failing(fail_when: FailWhen) -> Self {
            Self {
                submitted: Mutex::new(Vec::new()),
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
                fail_when,
                cancel_after_first: None,
            }
        }

        fn submitted(&self) -> Vec<Submitted> {
            self.submitted.lock().unwrap().clone()
        }

        fn starts(&self) -> Vec<usize> {
            self.submitted().iter().map(|s| s.start).collect()
        }
    }

    #[async_trait]
    impl BatchSink for RecordingSink {
        async fn submit_batch(&self, batch: &IngestBatch<'_>) -> Result<(), SubmitError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            tokio::task::yield_now().await;

            self.submitted.lock().unwrap().push(Submitted {
                file_name: batch.file_name.to_string(),
                start: batch.start_chunk_number,
                chunks: batch.chunks.to_vec(),
            });
            if let Some(token) = &self.cancel_after_first {
                token.cancel();
            }

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            if (self.fail_when)(batch) {
                return Err(SubmitError::Status {
                    status: 500,
                    body: "embedding backend unavailable".to_string(),
                });
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingReporter {
        events: Mutex<Vec<UploadEvent>>,
    }

    impl RecordingReporter {
        fn percents(&self) -> Vec<u8> {
            self.events
                .lock()
                .unwrap()
                .iter()
                .filter_map(|e| match e {
                    UploadEvent::Batch { percent, .. } => Some(*percent),
                    _ => None,
                })
                .collect()
        }
    }

    impl UploadProgressReporter for RecordingReporter {
        fn report(&self, event: UploadEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    fn chunks(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("chunk {}", i)).collect()
    }

    fn words(n: usize) -> String {
        (0..n)
            .map(|i| format!("w{}", i))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[tokio::test]
    async fn test_example_single_batch_reaches_100() {
        let sink = RecordingSink::new();
        let reporter = RecordingReporter::default();
        let chunks = chunk_text(&words(1200), &ChunkConfig::COMPACT);
        assert_eq!(chunks.len(), 3);

        let summary = upload_chunks(
            &sink,
            "essay.txt",
            &chunks,
            10,
            &reporter,
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(summary.batches, 1);
        assert_eq!(sink.starts(), vec![0]);
        assert_eq!(sink.submitted()[0].chunks, chunks);
        assert_eq!(reporter.percents(), vec![100]);
    }

    #[tokio::test]
    async fn test_batches_are_ordered_and_complete() {
        let sink = RecordingSink::new();
        let reporter = RecordingReporter::default();
        let input = chunks(10);

        let summary = upload_chunks(&sink, "a.txt", &input, 3, &reporter, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(summary.chunks, 10);
        assert_eq!(summary.batches, 4);
        assert_eq!(sink.starts(), vec![0, 3, 6, 9]);
        let rebuilt: Vec<String> = sink.submitted().into_iter().flat_map(|s| s.chunks).collect();
        assert_eq!(rebuilt, input);
        assert_eq!(reporter.percents(), vec![30, 60, 90, 100]);
        assert_eq!(sink.max_in_flight.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_abort_on_second_batch_failure() {
        let sink = RecordingSink::failing(Box::new(|b: &IngestBatch<'_>| {
            b.start_chunk_number == 3
        }));
        let reporter = RecordingReporter::default();

        let err = upload_chunks(
            &sink,
            "a.txt",
            &chunks(9),
            3,
            &reporter,
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

        assert_eq!(sink.starts(), vec![0, 3], "third batch must not be submitted");
        match err {
            UploadError::BatchFailed {
                document, offset, ..
            } => {
                assert_eq!(document, "a.txt");
                assert_eq!(offset, 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(reporter.percents(), vec![33]);
    }

    #[tokio::test]
    async fn test_failure_message_names_offset_and_document() {
        let sink = RecordingSink::failing(Box::new(|_: &IngestBatch<'_>| true));
        let err = upload_chunks(
            &sink,
            "bio notes.pdf",
            &chunks(2),
            5,
            &RecordingReporter::default(),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "ingestion failed for batch starting at offset 0 of document bio_notes.pdf"
        );
        assert_eq!(err.offset(), Some(0));
    }

    #[tokio::test]
    async fn test_document_name_is_normalized_before_submission() {
        let sink = RecordingSink::new();
        let summary = upload_chunks(
            &sink,
            "week 1  notes.txt",
            &chunks(2),
            1,
            &RecordingReporter::default(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();
        assert_eq!(summary.document, "week_1_notes.txt");
        assert!(sink
            .submitted()
            .iter()
            .all(|s| s.file_name == "week_1_notes.txt"));
    }

    #[tokio::test]
    async fn test_zero_batch_size_is_config_error() {
        let sink = RecordingSink::new();
        let err = upload_chunks(
            &sink,
            "a.txt",
            &chunks(2),
            0,
            &RecordingReporter::default(),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, UploadError::Config(_)));
        assert!(sink.submitted().is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let sink = RecordingSink::new();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = upload_chunks(&sink, "a.txt", &chunks(4), 2, &RecordingReporter::default(), &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::Cancelled { offset: 0, .. }));
        assert!(sink.submitted().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_between_batches() {
        let cancel = CancellationToken::new();
        let mut sink = RecordingSink::new();
        sink.cancel_after_first = Some(cancel.clone());

        let err = upload_chunks(&sink, "a.txt", &chunks(6), 2, &RecordingReporter::default(), &cancel)
            .await
            .unwrap_err();
        assert_eq!(sink.starts(), vec![0]);
        assert_eq!(err.offset(), Some(2));
    }

    #[tokio::test]
    async fn test_multi_document_run_continues_past_failures() {
        let sink = RecordingSink::failing(Box::new(|b: &IngestBatch<'_>| {
            b.file_name == "flaky_doc.txt"
        }));
        let store = InMemoryDocumentStore::new();
        let reporter = RecordingReporter::default();
        let options = UploadOptions {
            chunking: ChunkConfig::new(4, 1).unwrap(),
            batch_size: 2,
        };
        let inputs = vec![
            DocumentInput::from_text("first.txt", "one two three four five six seven"),
            DocumentInput {
                name: "broken.pdf".to_string(),
                content: DocumentContent::Bytes {
                    bytes: b"not a pdf".to_vec(),
                    content_type: extract::MIME_PDF.to_string(),
                },
            },
            DocumentInput::from_text("blank.txt", "  \n\t "),
            DocumentInput::from_text("flaky doc.txt", "alpha beta gamma"),
            DocumentInput::from_text("last.txt", "short text"),
        ];

        let reports = upload_documents(
            &inputs,
            &options,
            &sink,
            &store,
            &reporter,
            &CancellationToken::new(),
        )
        .await;

        assert_eq!(reports.len(), 5);
        assert!(reports[0].result.is_ok());
        assert!(matches!(
            reports[1].result,
            Err(UploadError::Extraction { .. })
        ));
        assert!(matches!(
            reports[2].result,
            Err(UploadError::EmptyContent { .. })
        ));
        assert!(matches!(
            reports[3].result,
            Err(UploadError::BatchFailed { offset: 0, .. })
        ));
        assert!(reports[4].result.is_ok());

        assert_eq!(store.list().await.unwrap(), vec!["last.txt", "first.txt"]);
        assert_eq!(store.active().await.unwrap().as_deref(), Some("last.txt"));

        let names: Vec<String> = sink.submitted().into_iter().map(|s| s.file_name).collect();
        assert!(!names.iter().any(|n| n == "broken.pdf" || n == "blank.txt"));
    }

    #[tokio::test]
    async fn test_cancelled_run_marks_remaining_documents() {
        let cancel = CancellationToken::new();
        let mut sink = RecordingSink::new();
        sink.cancel_after_first = Some(cancel.clone());
        let store = InMemoryDocumentStore::new();
        let options = UploadOptions {
            chunking: ChunkConfig::new(2, 0).unwrap(),
            batch_size: 1,
        };
        let inputs = vec![
            DocumentInput::from_text("a.txt", "a b c d"),
            DocumentInput::from_text("b.txt", "e f"),
        ];

        let reports = upload_documents(
            &inputs,
            &options,
            &sink,
            &store,
            &RecordingReporter::default(),
            &cancel,
        )
        .await;

        assert!(matches!(
            reports[0].result,
            Err(UploadError::Cancelled { offset: 1, .. })
        ));
        assert!(matches!(
            reports[1].result,
            Err(UploadError::Cancelled { offset: 0, .. })
        ));
        assert!(store.list().await.unwrap().is_empty());
    }

    #[test]
    fn test_prepare_document_counts() {
        let input = DocumentInput::from_text("essay.txt", &words(1200));
        let prepared = prepare_document(&input, &ChunkConfig::COMPACT).unwrap();
        assert_eq!(prepared.chunks.len(), 3);
        assert_eq!(prepared.batch_count(10), 1);
        assert_eq!(prepared.batch_count(2), 2);
    }
}
