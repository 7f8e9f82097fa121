//! `classory files` and `classory use`.

use anyhow::{bail, Result};
use classory_core::chunk::normalize_document_name;
use classory_core::store::DocumentStore;

use crate::config::Config;
use crate::state::FileDocumentStore;

/// Print every known document; the active one is marked with `*`.
pub async fn list_documents(config: &Config) -> Result<()> {
    let store = FileDocumentStore::new(&config.state.path);
    let documents = store.list().await?;
    let active = store.active().await?;

    if documents.is_empty() {
        println!("No documents uploaded yet.");
        return Ok(());
    }

    println!("{:<3}DOCUMENT", "");
    for name in &documents {
        let marker = if active.as_deref() == Some(name.as_str()) {
            "*"
        } else {
            ""
        };
        println!("{:<3}{}", marker, name);
    }

    Ok(())
}

/// Make `name` the active document. The name must already be known;
/// whitespace is normalized the same way uploads normalize it.
pub async fn select_document(store: &dyn DocumentStore, name: &str) -> Result<String> {
    let name = normalize_document_name(name.trim());
    let known = store.list().await?;
    if !known.iter().any(|d| *d == name) {
        if known.is_empty() {
            bail!("Unknown document '{}'. No documents uploaded yet.", name);
        }
        bail!(
            "Unknown document '{}'. Known documents: {}",
            name,
            known.join(", ")
        );
    }

    store.set_active(&name).await?;
    Ok(name)
}

pub async fn run_use(config: &Config, name: &str) -> Result<()> {
    let store = FileDocumentStore::new(&config.state.path);
    let selected = select_document(&store, name).await?;
    println!("Active document: {}", selected);
    Ok(())
}
