//! Overlapping word-window chunker.
//!
//! Splits document text into an ordered sequence of chunks of at most
//! `chunk_size` words, where each chunk repeats the last `overlap` words of
//! the chunk before it. The overlap keeps sentences that straddle a window
//! boundary retrievable from either side.
//!
//! # Algorithm
//!
//! 1. Tokenize the text on runs of whitespace.
//! 2. If the word count is `<= chunk_size`, return the original text
//!    unchanged as the only chunk.
//! 3. Otherwise, starting at word 0, take up to `chunk_size` words, join
//!    them with single spaces, and advance by `chunk_size - overlap`.
//! 4. Stop once the start index reaches the word count.
//!
//! Empty or all-whitespace input yields a single empty chunk.
//!
//! # Example
//!
//! ```rust
//! use classory_core::chunk::{chunk_text, ChunkConfig};
//!
//! let config = ChunkConfig::new(4, 1).unwrap();
//! let chunks = chunk_text("a b c d e f g", &config);
//! assert_eq!(chunks, vec!["a b c d", "d e f g", "g"]);
//! ```

use crate::error::ConfigError;

/// Validated chunking parameters.
///
/// Fields are private so that every instance satisfies
/// `chunk_size > 0` and `overlap < chunk_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkConfig {
    chunk_size: usize,
    overlap: usize,
}

impl ChunkConfig {
    /// 2000-word windows with 150 words of overlap.
    pub const LONG_FORM: Self = Self {
        chunk_size: 2000,
        overlap: 150,
    };

    /// 500-word windows with 50 words of overlap.
    pub const COMPACT: Self = Self {
        chunk_size: 500,
        overlap: 50,
    };

    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self, ConfigError> {
        if chunk_size == 0 {
            return Err(ConfigError::ChunkSizeZero);
        }
        if overlap >= chunk_size {
            return Err(ConfigError::OverlapTooLarge {
                overlap,
                chunk_size,
            });
        }
        Ok(Self {
            chunk_size,
            overlap,
        })
    }

    /// Look up a named preset (`long-form` or `compact`).
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "long-form" => Ok(Self::LONG_FORM),
            "compact" => Ok(Self::COMPACT),
            other => Err(ConfigError::UnknownPreset(other.to_string())),
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Distance between the first words of consecutive chunks. Always >= 1.
    pub fn step(&self) -> usize {
        self.chunk_size - self.overlap
    }
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self::LONG_FORM
    }
}

/// Split `text` into overlapping word windows.
///
/// # Guarantees
///
/// - At least one chunk is always returned.
/// - A text of at most `chunk_size` words comes back byte-for-byte.
/// - Otherwise every chunk but the last has exactly `chunk_size` words and
///   consecutive chunks share exactly `overlap` words.
/// - Pure: the same input and config always produce the same output.
pub fn chunk_text(text: &str, config: &ChunkConfig) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();

    if words.is_empty() {
        return vec![String::new()];
    }
    if words.len() <= config.chunk_size {
        return vec![text.to_string()];
    }

    let step = config.step();
    let mut chunks = Vec::with_capacity(words.len().div_ceil(step));
    let mut start = 0;
    while start < words.len() {
        let end = (start + config.chunk_size).min(words.len());
        chunks.push(words[start..end].join(" "));
        start += step;
    }
    chunks
}

/// Validate `chunk_size`/`overlap` and chunk `text` in one call.
pub fn chunk(text: &str, chunk_size: usize, overlap: usize) -> Result<Vec<String>, ConfigError> {
    let config = ChunkConfig::new(chunk_size, overlap)?;
    Ok(chunk_text(text, &config))
}

/// Replace every run of whitespace in a file name with a single `_`.
///
/// The ingestion service keys all chunks of a document under this name.
pub fn normalize_document_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_whitespace = false;
    for c in name.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                out.push('_');
            }
            in_whitespace = true;
        } else {
            out.push(c);
            in_whitespace = false;
        }
    }
    out
}
