//! Configuration for embedding backends
//!
//! Credentials for the remote providers come from the environment; everything
//! else can be loaded from a JSON file with [`MetricsConfig::load`].

use crate::embedding::{EmbeddingArgs, EmbeddingBackend};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Sentence encoder used by the local backend when none is configured
pub const DEFAULT_LOCAL_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// Remote embedding model used when no embedding args are given
pub const DEFAULT_OPENAI_EMBEDDING_MODEL: &str = "text-embedding-ada-002";

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Settings of the local sentence encoder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalModelConfig {
    /// HuggingFace Hub repository of a BERT-compatible sentence encoder
    pub model_id: String,
    /// Git revision to pin the weights to (default: `main`)
    pub revision: Option<String>,
    /// HuggingFace cache root; falls back to `HF_HOME`
    pub cache_dir: Option<PathBuf>,
    /// Inputs longer than this many tokens are truncated
    pub max_sequence_length: usize,
}

impl Default for LocalModelConfig {
    fn default() -> Self {
        LocalModelConfig {
            model_id: DEFAULT_LOCAL_MODEL.to_string(),
            revision: None,
            cache_dir: None,
            max_sequence_length: 256,
        }
    }
}

/// Top-level configuration, usually loaded from a JSON file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Backend used by `semantic_similarity` when the caller does not pick one
    pub backend: EmbeddingBackend,
    /// Args forwarded verbatim to the remote embeddings endpoint
    pub embedding_args: Option<EmbeddingArgs>,
    pub local_model: LocalModelConfig,
    /// Timeout applied to every remote embedding request
    pub request_timeout_secs: u64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        MetricsConfig {
            backend: EmbeddingBackend::Local,
            embedding_args: None,
            local_model: LocalModelConfig::default(),
            request_timeout_secs: 60,
        }
    }
}

impl MetricsConfig {
    /// Load a config file; missing keys take their default values
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Configuration(format!("Failed to read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            Error::Configuration(format!("Failed to parse {}: {}", path.display(), e))
        })
    }
}

fn required(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<String> {
    lookup(name)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::Configuration(format!("{} environment variable not set", name)))
}

/// Credentials for the OpenAI embeddings API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenAIConfig {
    pub api_key: String,
    pub base_url: String,
}

impl OpenAIConfig {
    /// Read `OPENAI_API_KEY` and the optional `OPENAI_BASE_URL`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(OpenAIConfig {
            api_key: required(&lookup, "OPENAI_API_KEY")?,
            base_url: lookup("OPENAI_BASE_URL")
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
        })
    }
}

/// Credentials for an Azure OpenAI resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AzureOpenAIConfig {
    pub api_key: String,
    pub api_version: String,
    pub endpoint: String,
}

impl AzureOpenAIConfig {
    /// Read `AZURE_OPENAI_KEY`, `OPENAI_API_VERSION` and `AZURE_OPENAI_ENDPOINT`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(AzureOpenAIConfig {
            api_key: required(&lookup, "AZURE_OPENAI_KEY")?,
            api_version: required(&lookup, "OPENAI_API_VERSION")?,
            endpoint: required(&lookup, "AZURE_OPENAI_ENDPOINT")?,
        })
    }
}
