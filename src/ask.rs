//! Question answering against the active document.
//!
//! `classory ask` sends one question; `classory chat` reads questions from
//! stdin, one per line, until EOF. Both resolve the target document from
//! `--file` or, by default, the store's active document.

use anyhow::{bail, Result};
use classory_core::chunk::normalize_document_name;
use classory_core::models::AskOutcome;
use classory_core::store::DocumentStore;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::client::{ApiClient, AskError};
use crate::config::Config;
use crate::state::FileDocumentStore;

pub const NO_ANSWER: &str = "No answer found.";
pub const UNEXPECTED_ERROR: &str = "Unexpected error occurred.";

/// Ask `question` against `file` or, if `None`, the active document.
///
/// `file` may be given as the original file name; it is normalized the same
/// way uploads are.
pub async fn answer_question(
    client: &ApiClient,
    store: &dyn DocumentStore,
    question: &str,
    file: Option<&str>,
) -> Result<AskOutcome, AskError> {
    let target = match file {
        Some(name) => Some(normalize_document_name(name.trim())),
        None => store
            .active()
            .await
            .map_err(|e| AskError::Store(format!("{:#}", e)))?,
    };
    let Some(target) = target.filter(|t| !t.is_empty()) else {
        return Err(AskError::NoActiveDocument);
    };

    tracing::debug!(document = %target, "asking question");
    client.ask(question, &target).await
}

/// Text shown to the user for a question's result.
pub fn render_answer(result: &Result<AskOutcome, AskError>) -> String {
    match result {
        Ok(AskOutcome::Answered(answer)) => answer.clone(),
        Ok(AskOutcome::NoAnswer) => NO_ANSWER.to_string(),
        Err(AskError::NoActiveDocument) => AskError::NoActiveDocument.to_string(),
        Err(_) => UNEXPECTED_ERROR.to_string(),
    }
}

/// CLI entry point for `classory ask`.
pub async fn run_ask(config: &Config, question: &str, file: Option<&str>) -> Result<()> {
    let question = question.trim();
    if question.is_empty() {
        bail!("question must not be empty");
    }

    let client = ApiClient::new(&config.api)?;
    let store = FileDocumentStore::new(&config.state.path);

    let result = answer_question(&client, &store, question, file).await;
    if let Err(e) = &result {
        tracing::warn!(error = %e, "question failed");
    }
    println!("{}", render_answer(&result));

    match result {
        Ok(_) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// CLI entry point for `classory chat`.
pub async fn run_chat(config: &Config, file: Option<&str>) -> Result<()> {
    let client = ApiClient::new(&config.api)?;
    let store = FileDocumentStore::new(&config.state.path);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let question = line.trim();
        if question.is_empty() {
            continue;
        }

        let result = answer_question(&client, &store, question, file).await;
        println!("{}", render_answer(&result));
        match result {
            Err(AskError::NoActiveDocument) => bail!(AskError::NoActiveDocument),
            Err(e) => tracing::warn!(error = %e, "question failed"),
            Ok(_) => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_answer() {
        assert_eq!(
            render_answer(&Ok(AskOutcome::Answered("Mitochondria.".into()))),
            "Mitochondria."
        );
        assert_eq!(render_answer(&Ok(AskOutcome::NoAnswer)), NO_ANSWER);
        assert_eq!(
            render_answer(&Err(AskError::NoActiveDocument)),
            "Please upload or select a file first."
        );
        assert_eq!(
            render_answer(&Err(AskError::Transport {
                url: "http://x/api/ask".into(),
                message: "refused".into()
            })),
            UNEXPECTED_ERROR
        );
    }
}
