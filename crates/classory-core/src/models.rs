//! Wire models for the ingestion and question-answering API.
//!
//! Field names follow the service's camelCase JSON contract.

use serde::{Deserialize, Serialize};

use crate::batch::Batch;

/// Body of `POST /api/process-batch`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestBatch<'a> {
    pub file_name: &'a str,
    pub chunks: &'a [String],
    pub start_chunk_number: usize,
}

impl<'a> IngestBatch<'a> {
    pub fn new(file_name: &'a str, batch: &Batch<'a>) -> Self {
        Self {
            file_name,
            chunks: batch.chunks,
            start_chunk_number: batch.start_chunk_number,
        }
    }
}

/// Body of `POST /api/ask`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AskRequest<'a> {
    pub question: &'a str,
    pub file_name: &'a str,
}

/// Response of `POST /api/ask`.
#[derive(Debug, Clone, Deserialize)]
pub struct AskResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub answer: Option<String>,
}

/// What a question round trip produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AskOutcome {
    Answered(String),
    /// The service responded but had no answer for this document.
    NoAnswer,
}
