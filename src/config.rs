use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub corpus: CorpusConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub audit: AuditConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CorpusConfig {
    /// Directory scanned for corpus files.
    #[serde(default = "default_corpus_dir")]
    pub dir: PathBuf,
    /// Glob patterns a file's path (relative to `dir`) must match.
    #[serde(default = "default_include_globs")]
    pub include_globs: Vec<String>,
    /// Descend into subdirectories. Off by default: only files directly
    /// under `dir` are loaded.
    #[serde(default)]
    pub recursive: bool,
    /// Skip files that cannot be read instead of aborting the load.
    #[serde(default = "default_skip_unreadable")]
    pub skip_unreadable: bool,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            dir: default_corpus_dir(),
            include_globs: default_include_globs(),
            recursive: false,
            skip_unreadable: default_skip_unreadable(),
        }
    }
}

fn default_corpus_dir() -> PathBuf {
    PathBuf::from("data")
}
fn default_include_globs() -> Vec<String> {
    vec!["*.md".to_string()]
}
fn default_skip_unreadable() -> bool {
    true
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChunkingConfig {
    /// Maximum segment length in characters.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Characters carried over between adjacent segments.
    /// Must be smaller than `chunk_size`.
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
        }
    }
}

fn default_chunk_size() -> usize {
    3500
}
fn default_chunk_overlap() -> usize {
    50
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetrievalConfig {
    /// Number of segments returned per query.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

fn default_top_k() -> usize {
    4
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmbeddingConfig {
    #[serde(default = "default_embedding_model")]
    pub model: String,
    /// Texts sent per embeddings API call.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Override the provider base URL (e.g. for a compatible proxy).
    #[serde(default)]
    pub base_url: Option<String>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: default_embedding_model(),
            batch_size: default_batch_size(),
            max_retries: default_max_retries(),
            timeout_secs: default_timeout_secs(),
            base_url: None,
        }
    }
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}
fn default_batch_size() -> usize {
    64
}
fn default_max_retries() -> u32 {
    5
}
fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChatConfig {
    #[serde(default = "default_chat_model")]
    pub model: String,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Override the provider base URL (e.g. for a compatible proxy).
    #[serde(default)]
    pub base_url: Option<String>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            model: default_chat_model(),
            max_retries: default_max_retries(),
            timeout_secs: default_timeout_secs(),
            base_url: None,
        }
    }
}

fn default_chat_model() -> String {
    "gpt-4o-mini".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuditConfig {
    /// Pangea service domain. A value starting with `http://` or
    /// `https://` is used verbatim as the endpoint base URL.
    #[serde(default = "default_audit_domain")]
    pub domain: String,
    /// Audit configuration id attached to each logged event.
    #[serde(default)]
    pub config_id: Option<String>,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            domain: default_audit_domain(),
            config_id: None,
            max_retries: default_max_retries(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_audit_domain() -> String {
    "aws.us.pangea.cloud".to_string()
}

/// Secrets collected once at startup and handed to the components that
/// need them. Nothing below the binary reads the process environment.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Pangea Secure Audit Log API token.
    pub audit_token: String,
    /// OpenAI API key, passed through to the provider clients. Whether it
    /// is valid is the provider's call, not ours.
    pub openai_api_key: String,
}

impl Config {
    /// Check the invariants that must hold before any I/O runs.
    pub fn validate(&self) -> Result<()> {
        if self.chunking.chunk_size == 0 {
            return Err(Error::Config(
                "chunking.chunk_size must be > 0".to_string(),
            ));
        }
        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(Error::Config(format!(
                "chunking.chunk_overlap ({}) must be smaller than chunking.chunk_size ({})",
                self.chunking.chunk_overlap, self.chunking.chunk_size
            )));
        }
        if self.retrieval.top_k == 0 {
            return Err(Error::Config("retrieval.top_k must be >= 1".to_string()));
        }
        if self.embedding.batch_size == 0 {
            return Err(Error::Config(
                "embedding.batch_size must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("failed to read config file {}: {}", path.display(), e))
    })?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("failed to parse config file: {}", e)))?;

    config.validate()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.corpus.dir, PathBuf::from("data"));
        assert_eq!(config.corpus.include_globs, vec!["*.md".to_string()]);
        assert!(!config.corpus.recursive);
        assert!(config.corpus.skip_unreadable);
        assert_eq!(config.chunking.chunk_size, 3500);
        assert_eq!(config.chunking.chunk_overlap, 50);
        assert_eq!(config.retrieval.top_k, 4);
        assert_eq!(config.embedding.model, "text-embedding-3-small");
        assert_eq!(config.chat.model, "gpt-4o-mini");
        assert_eq!(config.audit.domain, "aws.us.pangea.cloud");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [chunking]
            chunk_size = 800
            "#,
        )
        .unwrap();
        assert_eq!(config.chunking.chunk_size, 800);
        assert_eq!(config.chunking.chunk_overlap, 50);
        assert_eq!(config.retrieval.top_k, 4);
    }

    #[test]
    fn test_overlap_equal_to_size_rejected() {
        let config: Config = toml::from_str(
            r#"
            [chunking]
            chunk_size = 100
            chunk_overlap = 100
            "#,
        )
        .unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("chunk_overlap"));
    }

    #[test]
    fn test_overlap_larger_than_size_rejected() {
        let config: Config = toml::from_str(
            r#"
            [chunking]
            chunk_size = 100
            chunk_overlap = 150
            "#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let config: Config = toml::from_str(
            r#"
            [chunking]
            chunk_size = 0
            chunk_overlap = 0
            "#,
        )
        .unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("chunk_size"));
    }

    #[test]
    fn test_zero_top_k_rejected() {
        let config: Config = toml::from_str(
            r#"
            [retrieval]
            top_k = 0
            "#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }
}
