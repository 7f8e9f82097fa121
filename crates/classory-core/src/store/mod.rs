//! Known-document store abstraction.
//!
//! The [`DocumentStore`] trait records which documents have been fully
//! ingested and which one questions are currently asked against. Keeping it
//! behind a trait lets the upload pipeline run against an in-memory store in
//! tests and a JSON file in the CLI.
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

/// Persistent list of uploaded document names plus the active document.
///
/// # Operations
///
/// | Method | Purpose |
/// |--------|---------|
/// | `list` | Known document names, most recently uploaded first |
/// | `add` | Record a successfully uploaded document (idempotent) |
/// | `active` | Document questions are asked against, if any |
/// | `set_active` | Switch the active document |
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn list(&self) -> Result<Vec<String>>;

    /// Record `name` as the most recent upload. A known name moves to the
    /// front instead of being duplicated.
    async fn add(&self, name: &str) -> Result<()>;

    async fn active(&self) -> Result<Option<String>>;

    async fn set_active(&self, name: &str) -> Result<()>;
}

/// Known document names plus the active one, as a plain value.
///
/// Shared by store implementations that keep the whole state in one place.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DocumentSet {
    #[serde(default)]
    pub documents: Vec<String>,
    #[serde(default)]
    pub active: Option<String>,
}

impl DocumentSet {
    /// Put `name` at the front. Returns `true` if it was not known before.
    pub fn insert(&mut self, name: &str) -> bool {
        let existing = self.documents.iter().position(|d| d == name);
        if let Some(index) = existing {
            self.documents.remove(index);
        }
        self.documents.insert(0, name.to_string());
        existing.is_none()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.documents.iter().any(|d| d == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_puts_newest_first() {
        let mut set = DocumentSet::default();
        assert!(set.insert("b.txt"));
        assert!(set.insert("a.pdf"));
        assert_eq!(set.documents, vec!["a.pdf", "b.txt"]);

        // Re-uploading moves the name back to the front without duplicating it.
        assert!(!set.insert("b.txt"));
        assert_eq!(set.documents, vec!["b.txt", "a.pdf"]);
        assert!(set.contains("a.pdf"));
        assert!(!set.contains("c.pdf"));
    }
}
