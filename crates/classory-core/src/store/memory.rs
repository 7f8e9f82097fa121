//! In-memory [`DocumentStore`] implementation for tests and embedding.
//!
//! Uses a [`DocumentSet`] behind `std::sync::RwLock`; every call returns an
//! immediately-ready future.

use std::sync::RwLock;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use super::{DocumentSet, DocumentStore};

#[derive(Default)]
pub struct InMemoryDocumentStore {
    state: RwLock<DocumentSet>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing set, e.g. one loaded elsewhere.
    pub fn with_documents(set: DocumentSet) -> Self {
        Self {
            state: RwLock::new(set),
        }
    }

    pub fn snapshot(&self) -> Result<DocumentSet> {
        let state = self.state.read().map_err(|_| anyhow!("store lock poisoned"))?;
        Ok(state.clone())
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn list(&self) -> Result<Vec<String>> {
        Ok(self.snapshot()?.documents)
    }

    async fn add(&self, name: &str) -> Result<()> {
        let mut state = self
            .state
            .write()
            .map_err(|_| anyhow!("store lock poisoned"))?;
        state.insert(name);
        Ok(())
    }

    async fn active(&self) -> Result<Option<String>> {
        Ok(self.snapshot()?.active)
    }

    async fn set_active(&self, name: &str) -> Result<()> {
        let mut state = self
            .state
            .write()
            .map_err(|_| anyhow!("store lock poisoned"))?;
        state.active = Some(name.to_string());
        Ok(())
    }
}
