//! Upload progress reporting.
//!
//! Reports what `classory upload` is doing per document: parsing, each
//! completed batch with its percentage, and the final outcome. Progress is
//! emitted on **stderr** so stdout stays parseable for scripts.

use std::io::Write;

/// A single progress event for one document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UploadEvent {
    /// Text is being extracted from the file.
    Parsing { document: String },
    /// A batch was accepted by the ingestion endpoint.
    Batch {
        document: String,
        start_chunk_number: usize,
        total_chunks: usize,
        percent: u8,
    },
    /// Every batch of the document was accepted.
    Completed { document: String, chunks: usize },
    /// The document was abandoned; `reason` is the error message.
    Failed { document: String, reason: String },
}

/// Receives progress events. Implementations write to stderr (human or JSON).
pub trait UploadProgressReporter: Send + Sync {
    fn report(&self, event: UploadEvent);
}

/// Human-friendly progress on stderr: `lecture_1.pdf: 40%`.
pub struct StderrProgress;

impl UploadProgressReporter for StderrProgress {
    fn report(&self, event: UploadEvent) {
        let line = match &event {
            UploadEvent::Parsing { document } => format!("Parsing {}...\n", document),
            UploadEvent::Batch {
                document, percent, ..
            } => format!("{}: {}%\n", document, percent),
            UploadEvent::Completed { document, .. } => {
                format!("File \"{}\" processed successfully!\n", document)
            }
            UploadEvent::Failed { document, reason } => {
                format!("File \"{}\" failed: {}\n", document, reason)
            }
        };
        let mut stderr = std::io::stderr().lock();
        let _ = stderr.write_all(line.as_bytes());
        let _ = stderr.flush();
    }
}

/// Machine-readable progress: one JSON object per line on stderr.
pub struct JsonProgress;

impl UploadProgressReporter for JsonProgress {
    fn report(&self, event: UploadEvent) {
        let obj = match &event {
            UploadEvent::Parsing { document } => serde_json::json!({
                "event": "parsing",
                "document": document,
            }),
            UploadEvent::Batch {
                document,
                start_chunk_number,
                total_chunks,
                percent,
            } => serde_json::json!({
                "event": "batch",
                "document": document,
                "start_chunk_number": start_chunk_number,
                "total_chunks": total_chunks,
                "percent": percent,
            }),
            UploadEvent::Completed { document, chunks } => serde_json::json!({
                "event": "completed",
                "document": document,
                "chunks": chunks,
            }),
            UploadEvent::Failed { document, reason } => serde_json::json!({
                "event": "failed",
                "document": document,
                "reason": reason,
            }),
        };
        if let Ok(line) = serde_json::to_string(&obj) {
            let mut stderr = std::io::stderr().lock();
            let _ = writeln!(stderr, "{}", line);
            let _ = stderr.flush();
        }
    }
}

/// No-op reporter when progress is disabled.
pub struct NoProgress;

impl UploadProgressReporter for NoProgress {
    fn report(&self, _event: UploadEvent) {}
}

/// Progress mode for the CLI: off, human (stderr), or JSON (stderr).
#[derive(Clone, Copy, Debug, Eq, PartialEq, clap::ValueEnum)]
pub enum ProgressMode {
    Off,
    Human,
    Json,
}

impl ProgressMode {
    /// Default: human progress when stderr is a TTY, otherwise off.
    pub fn default_for_tty() -> Self {
        if atty::is(atty::Stream::Stderr) {
            ProgressMode::Human
        } else {
            ProgressMode::Off
        }
    }

    pub fn reporter(&self) -> Box<dyn UploadProgressReporter> {
        match self {
            ProgressMode::Off => Box::new(NoProgress),
            ProgressMode::Human => Box::new(StderrProgress),
            ProgressMode::Json => Box::new(JsonProgress),
        }
    }
}
