//! # Classory
//!
//! Upload study material to a retrieval-augmented question-answering
//! service and ask questions about it.
//!
//! Each document is turned into plain text, split into overlapping word
//! windows, and sent to the ingestion endpoint in fixed-size batches, one
//! batch at a time. Questions are then asked against the most recently
//! uploaded (or explicitly selected) document.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────┐   ┌──────────┐   ┌──────────────────────┐
//! │ collect  │──▶│ extract  │──▶│  chunk   │──▶│ POST /api/process-   │
//! │ txt/pdf  │   │ pdf/utf8 │   │ windows  │   │ batch (sequential)   │
//! └──────────┘   └──────────┘   └──────────┘   └──────────┬───────────┘
//!                                                         ▼
//!                ┌──────────┐                      ┌──────────────┐
//!                │ POST     │◀─── active doc ──────│ documents    │
//!                │ /api/ask │                      │ .json state  │
//!                └──────────┘                      └──────────────┘
//! ```
//!
//! The I/O-free pieces (chunking, batch planning, wire models, the
//! [`classory_core::sink::BatchSink`] and
//! [`classory_core::store::DocumentStore`] traits) live in `classory-core`.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`collect`] | Resolve path arguments into files |
//! | [`extract`] | PDF / plain-text extraction |
//! | [`upload`] | Sequential batched upload pipeline |
//! | [`ingest`] | `upload` command |
//! | [`client`] | HTTP client for the ingestion and ask endpoints |
//! | [`ask`] | `ask` and `chat` commands |
//! | [`documents`] | `files` and `use` commands |
//! | [`state`] | JSON-file document store |
//! | [`progress`] | Upload progress reporting |
//! | [`error`] | Upload error types |

pub mod ask;
pub mod client;
pub mod collect;
pub mod config;
pub mod documents;
pub mod error;
pub mod extract;
pub mod ingest;
pub mod progress;
pub mod state;
pub mod upload;
