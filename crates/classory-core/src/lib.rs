//! # Classory Core
//!
//! Shared, I/O-free logic for Classory: word-window chunking, batch
//! planning and progress accounting, wire models for the ingestion and
//! question-answering API, and the known-document store abstraction.
//!
//! This crate contains no tokio, HTTP, or filesystem dependencies. The
//! `classory` crate supplies the network sink, text extraction, and the
//! persistent store.

pub mod batch;
pub mod chunk;
pub mod error;
pub mod models;
pub mod sink;
pub mod store;
