//! HTTP client for the ingestion and question-answering API.
//!
//! | Method | Path | Body |
//! |--------|------|------|
//! | `POST` | `/api/process-batch` | `{ fileName, chunks, startChunkNumber }` |
//! | `POST` | `/api/ask` | `{ question, fileName }` → `{ success, answer }` |
//!
//! Any 2xx from `process-batch` counts as success; the body is ignored.
//! Neither call is retried here. Every request is bounded by
//! `api.timeout_secs`.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use classory_core::error::SubmitError;
use classory_core::models::{AskOutcome, AskRequest, AskResponse, IngestBatch};
use classory_core::sink::BatchSink;
use thiserror::Error;

use crate::config::ApiConfig;

/// Question-answering failures that are not a "no answer" response.
#[derive(Debug, Error)]
pub enum AskError {
    #[error("Please upload or select a file first.")]
    NoActiveDocument,
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
    #[error("malformed response from {url}: {message}")]
    Malformed { url: String, message: String },
    #[error("could not read document state: {0}")]
    Store(String),
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Ask `question` against the document stored as `file_name`.
    pub async fn ask(&self, question: &str, file_name: &str) -> Result<AskOutcome, AskError> {
        let url = self.endpoint("/api/ask");
        let body = AskRequest {
            question,
            file_name,
        };

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AskError::Transport {
                url: url.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        let parsed: AskResponse = response.json().await.map_err(|e| AskError::Malformed {
            url: url.clone(),
            message: e.to_string(),
        })?;

        tracing::debug!(%status, success = parsed.success, "ask response");

        match parsed.answer {
            Some(answer) if status.is_success() && parsed.success => {
                Ok(AskOutcome::Answered(answer))
            }
            _ => Ok(AskOutcome::NoAnswer),
        }
    }
}

#[async_trait]
impl BatchSink for ApiClient {
    async fn submit_batch(&self, batch: &IngestBatch<'_>) -> Result<(), SubmitError> {
        let url = self.endpoint("/api/process-batch");
        tracing::debug!(
            file_name = batch.file_name,
            start_chunk_number = batch.start_chunk_number,
            chunks = batch.chunks.len(),
            "submitting batch"
        );

        let response = self
            .http
            .post(&url)
            .json(batch)
            .send()
            .await
            .map_err(|e| SubmitError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(SubmitError::Status {
            status: status.as_u16(),
            body,
        })
    }
}
