//! # Classory CLI (`classory`)
//!
//! ## Usage
//!
//! ```bash
//! classory --config ./config/classory.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `classory upload <paths…>` | Chunk and upload `.txt` / `.pdf` documents |
//! | `classory ask "<question>"` | Ask a question about the active document |
//! | `classory chat` | Ask questions read from stdin, one per line |
//! | `classory files` | List uploaded documents |
//! | `classory use <name>` | Switch the active document |
//!
//! ## Examples
//!
//! ```bash
//! # Upload a lecture and a folder of notes
//! classory upload "Week 1.pdf" ./notes
//!
//! # Smaller windows, show what would be sent
//! classory upload ./notes --preset compact --dry-run
//!
//! # Ask about the last uploaded document
//! classory ask "What is osmosis?"
//!
//! # Ask about another one
//! classory ask "Summarize chapter 2" --file Week_1.pdf
//! ```
//!
//! Logging goes to stderr and is controlled by `RUST_LOG`
//! (default `classory=warn`).

use classory::ask;
use classory::config;
use classory::documents;
use classory::ingest::{self, UploadOverrides};
use classory::progress::ProgressMode;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Classory: upload study material and ask questions about it.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. When the file does not exist the built-in defaults are used.
#[derive(Parser)]
#[command(
    name = "classory",
    about = "Upload study material to a question-answering service and ask questions about it",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/classory.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chunk documents and send them to the ingestion endpoint.
    ///
    /// Files are uploaded one at a time, each in sequential batches. A
    /// document whose batch is rejected is abandoned; the rest still run.
    /// Directories are walked using `[upload].include_globs`.
    Upload {
        /// Files or directories to upload.
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Chunks per ingestion request.
        #[arg(long)]
        batch_size: Option<usize>,

        /// Words per chunk.
        #[arg(long)]
        chunk_size: Option<usize>,

        /// Words repeated from the end of the previous chunk.
        #[arg(long)]
        overlap: Option<usize>,

        /// Chunking preset: `long-form` (2000/150) or `compact` (500/50).
        #[arg(long)]
        preset: Option<String>,

        /// Show document, chunk, and batch counts without uploading.
        #[arg(long)]
        dry_run: bool,

        /// Progress output on stderr. Defaults to `human` on a terminal,
        /// `off` otherwise.
        #[arg(long, value_enum)]
        progress: Option<ProgressMode>,
    },

    /// Ask one question about a document.
    Ask {
        question: String,

        /// Document to ask about instead of the active one.
        #[arg(long)]
        file: Option<String>,
    },

    /// Ask questions read from stdin, one per line, until EOF.
    Chat {
        /// Document to ask about instead of the active one.
        #[arg(long)]
        file: Option<String>,
    },

    /// List uploaded documents; `*` marks the active one.
    Files,

    /// Make an uploaded document the active one.
    Use { name: String },
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "classory=warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let cfg = config::load_or_default(&cli.config)?;

    match cli.command {
        Commands::Upload {
            paths,
            batch_size,
            chunk_size,
            overlap,
            preset,
            dry_run,
            progress,
        } => {
            let overrides = UploadOverrides {
                batch_size,
                chunk_size,
                overlap,
                preset,
            };
            let progress = progress.unwrap_or_else(ProgressMode::default_for_tty);

            let cancel = CancellationToken::new();
            let on_signal = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::warn!("interrupt received, cancelling upload");
                    on_signal.cancel();
                }
            });

            ingest::run_upload(&cfg, &paths, &overrides, dry_run, progress, cancel).await?;
        }
        Commands::Ask { question, file } => {
            ask::run_ask(&cfg, &question, file.as_deref()).await?;
        }
        Commands::Chat { file } => {
            ask::run_chat(&cfg, file.as_deref()).await?;
        }
        Commands::Files => {
            documents::list_documents(&cfg).await?;
        }
        Commands::Use { name } => {
            documents::run_use(&cfg, &name).await?;
        }
    }

    Ok(())
}
