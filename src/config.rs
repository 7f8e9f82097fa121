use anyhow::{Context, Result};
use classory_core::chunk::ChunkConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable that overrides `[api].base_url`.
pub const API_BASE_ENV: &str = "CLASSORY_API_BASE";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub upload: UploadConfig,
    #[serde(default)]
    pub state: StateConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout, applied to every batch and every question.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:3001".to_string()
}
fn default_timeout_secs() -> u64 {
    60
}

/// Chunk window settings. `preset` supplies both values; explicit
/// `chunk_size`/`overlap` override the preset's.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ChunkingConfig {
    #[serde(default)]
    pub preset: Option<String>,
    #[serde(default)]
    pub chunk_size: Option<usize>,
    #[serde(default)]
    pub overlap: Option<usize>,
}

impl ChunkingConfig {
    /// Resolve to validated parameters. Defaults to the long-form preset.
    pub fn resolve(&self) -> Result<ChunkConfig> {
        let base = match &self.preset {
            Some(name) => ChunkConfig::from_preset(name)?,
            None => ChunkConfig::default(),
        };
        let chunk_size = self.chunk_size.unwrap_or(base.chunk_size());
        let overlap = self.overlap.unwrap_or(base.overlap());
        ChunkConfig::new(chunk_size, overlap).with_context(|| "Invalid [chunking] settings")
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct UploadConfig {
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_include_globs")]
    pub include_globs: Vec<String>,
    #[serde(default)]
    pub exclude_globs: Vec<String>,
    #[serde(default)]
    pub follow_symlinks: bool,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            include_globs: default_include_globs(),
            exclude_globs: Vec::new(),
            follow_symlinks: false,
        }
    }
}

fn default_batch_size() -> usize {
    15
}
fn default_include_globs() -> Vec<String> {
    vec!["**/*.txt".to_string(), "**/*.pdf".to_string()]
}

#[derive(Debug, Deserialize, Clone)]
pub struct StateConfig {
    /// JSON file holding known document names and the active document.
    #[serde(default = "default_state_path")]
    pub path: PathBuf,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            path: default_state_path(),
        }
    }
}

fn default_state_path() -> PathBuf {
    PathBuf::from("./data/documents.json")
}

/// Load and validate a config file.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    finish(config)
}

/// Like [`load_config`], but a missing file yields the defaults.
pub fn load_or_default(path: &Path) -> Result<Config> {
    if path.exists() {
        load_config(path)
    } else {
        tracing::debug!(path = %path.display(), "config file not found, using defaults");
        finish(Config::default())
    }
}

fn finish(mut config: Config) -> Result<Config> {
    if let Ok(base) = std::env::var(API_BASE_ENV) {
        if !base.trim().is_empty() {
            config.api.base_url = base;
        }
    }
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    config.chunking.resolve()?;

    if config.upload.batch_size == 0 {
        anyhow::bail!("upload.batch_size must be > 0");
    }

    if config.api.timeout_secs == 0 {
        anyhow::bail!("api.timeout_secs must be > 0");
    }

    let base = config.api.base_url.as_str();
    if !(base.starts_with("http://") || base.starts_with("https://")) {
        anyhow::bail!(
            "api.base_url must start with http:// or https://, got '{}'",
            base
        );
    }

    Ok(())
}
