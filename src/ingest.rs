//! `classory upload` command.
//!
//! Resolves the command-line overrides against the config, collects the
//! files to send, and runs them through [`crate::upload::upload_documents`].
//! Prints a summary on stdout and fails if any document did not upload.

use std::path::PathBuf;

use anyhow::{bail, Result};
use tokio_util::sync::CancellationToken;

use crate::client::ApiClient;
use crate::collect::collect_files;
use crate::config::Config;
use crate::progress::ProgressMode;
use crate::state::FileDocumentStore;
use crate::upload::{prepare_document, upload_documents, DocumentInput, UploadOptions};

/// Per-invocation overrides for the `[chunking]` and `[upload]` sections.
#[derive(Debug, Clone, Default)]
pub struct UploadOverrides {
    pub batch_size: Option<usize>,
    pub chunk_size: Option<usize>,
    pub overlap: Option<usize>,
    pub preset: Option<String>,
}

impl UploadOverrides {
    /// Merge into the configured values and validate the result.
    ///
    /// A preset given here replaces the configured window entirely unless
    /// `chunk_size`/`overlap` are also given.
    pub fn resolve(&self, config: &Config) -> Result<UploadOptions> {
        let mut chunking = config.chunking.clone();
        if let Some(preset) = &self.preset {
            chunking.preset = Some(preset.clone());
            chunking.chunk_size = None;
            chunking.overlap = None;
        }
        if self.chunk_size.is_some() {
            chunking.chunk_size = self.chunk_size;
        }
        if self.overlap.is_some() {
            chunking.overlap = self.overlap;
        }

        let batch_size = self.batch_size.unwrap_or(config.upload.batch_size);
        if batch_size == 0 {
            bail!("--batch-size must be > 0");
        }

        Ok(UploadOptions {
            chunking: chunking.resolve()?,
            batch_size,
        })
    }
}

pub async fn run_upload(
    config: &Config,
    paths: &[PathBuf],
    overrides: &UploadOverrides,
    dry_run: bool,
    progress: ProgressMode,
    cancel: CancellationToken,
) -> Result<()> {
    let options = overrides.resolve(config)?;
    let files = collect_files(paths, &config.upload)?;
    if files.is_empty() {
        bail!("No uploadable files found");
    }

    let inputs: Vec<DocumentInput> = files.iter().map(|p| DocumentInput::from_path(p)).collect();

    if dry_run {
        print_dry_run(&inputs, &options);
        return Ok(());
    }

    let client = ApiClient::new(&config.api)?;
    let store = FileDocumentStore::new(&config.state.path);
    let reporter = progress.reporter();

    tracing::info!(
        documents = inputs.len(),
        base_url = client.base_url(),
        chunk_size = options.chunking.chunk_size(),
        overlap = options.chunking.overlap(),
        batch_size = options.batch_size,
        "starting upload"
    );

    let reports = upload_documents(
        &inputs,
        &options,
        &client,
        &store,
        reporter.as_ref(),
        &cancel,
    )
    .await;

    let uploaded: Vec<_> = reports
        .iter()
        .filter_map(|r| r.result.as_ref().ok())
        .collect();
    let chunks_sent: usize = uploaded.iter().map(|s| s.chunks).sum();
    let failed = reports.len() - uploaded.len();

    println!("upload");
    println!("  documents: {}", reports.len());
    println!("  uploaded: {}", uploaded.len());
    println!("  chunks sent: {}", chunks_sent);
    for report in &reports {
        if let Err(e) = &report.result {
            println!("  failed: {} ({})", report.document, e);
        }
    }
    if let Some(last) = uploaded.last() {
        println!("  active: {}", last.document);
    }

    if failed > 0 {
        bail!("{} of {} documents failed to upload", failed, reports.len());
    }
    println!("ok");
    Ok(())
}

fn print_dry_run(inputs: &[DocumentInput], options: &UploadOptions) {
    println!("upload (dry-run)");
    println!("  documents: {}", inputs.len());
    println!(
        "  chunking: {} words, {} overlap",
        options.chunking.chunk_size(),
        options.chunking.overlap()
    );
    println!("  batch size: {}", options.batch_size);

    let mut total_chunks = 0usize;
    for input in inputs {
        match prepare_document(input, &options.chunking) {
            Ok(prepared) => {
                total_chunks += prepared.chunks.len();
                println!(
                    "  {}: {} chunks, {} batches",
                    prepared.document,
                    prepared.chunks.len(),
                    prepared.batch_count(options.batch_size)
                );
            }
            Err(e) => println!("  {}: skipped ({})", input.name, e),
        }
    }
    println!("  estimated chunks: {}", total_chunks);
}
