//! JSON-file [`DocumentStore`].
//!
//! Persists the known document names and the active document between CLI
//! invocations:
//!
//! ```json
//! { "documents": ["week_1.pdf", "notes.txt"], "active": "notes.txt" }
//! ```
//!
//! Every mutation is a read-modify-write of the whole file, serialized by an
//! in-process mutex. The file is written to a sibling temp file and renamed
//! into place.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use classory_core::store::{DocumentSet, DocumentStore};
use tokio::sync::Mutex;

pub struct FileDocumentStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileDocumentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current contents; a missing file is an empty set.
    pub async fn load(&self) -> Result<DocumentSet> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(DocumentSet::default()),
            Ok(content) => serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse state file: {}", self.path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(DocumentSet::default()),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to read state file: {}", self.path.display())),
        }
    }

    async fn save(&self, set: &DocumentSet) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.with_context(|| {
                    format!("Failed to create state directory: {}", parent.display())
                })?;
            }
        }

        let json = serde_json::to_string_pretty(set)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .with_context(|| format!("Failed to write state file: {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("Failed to replace state file: {}", self.path.display()))?;
        Ok(())
    }

    async fn update<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut DocumentSet) + Send,
    {
        let _guard = self.lock.lock().await;
        let mut set = self.load().await?;
        f(&mut set);
        self.save(&set).await
    }
}

#[async_trait]
impl DocumentStore for FileDocumentStore {
    async fn list(&self) -> Result<Vec<String>> {
        Ok(self.load().await?.documents)
    }

    async fn add(&self, name: &str) -> Result<()> {
        self.update(|set| {
            set.insert(name);
        })
        .await
    }

    async fn active(&self) -> Result<Option<String>> {
        Ok(self.load().await?.active)
    }

    async fn set_active(&self, name: &str) -> Result<()> {
        let name = name.to_string();
        self.update(move |set| set.active = Some(name)).await
    }
}
