//! Local sentence encoder using Candle
//!
//! Loads a BERT-compatible sentence-transformers model from the HuggingFace
//! Hub and runs it on the CPU. It respects the HF_HOME cache directory and
//! the HF_TOKEN environment variable.

use super::Embedder;
use crate::config::LocalModelConfig;
use crate::{Error, Result};
use candle_core::{Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config, DTYPE};
use hf_hub::api::sync::ApiBuilder;
use hf_hub::{Repo, RepoType};
use std::path::PathBuf;
use tokenizers::{Tokenizer, TruncationParams};
use tracing::{debug, info};

/// Sentence encoder that runs a BERT model locally
///
/// Embeddings are mean-pooled over the attention mask and L2-normalized, as
/// sentence-transformers does. Loading is the expensive part: build one
/// `LocalEmbedder` and reuse it across metric calls.
///
/// Known-good models:
/// - `sentence-transformers/all-MiniLM-L6-v2` (384 dim, default)
/// - `sentence-transformers/all-MiniLM-L12-v2` (384 dim)
/// - `BAAI/bge-small-en-v1.5` (384 dim)
pub struct LocalEmbedder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
    model_name: String,
    dimension: usize,
}

impl LocalEmbedder {
    /// Download (if not cached) and load the configured model
    ///
    /// # Example
    /// ```no_run
    /// use refmetrics::config::LocalModelConfig;
    /// use refmetrics::embedding::LocalEmbedder;
    ///
    /// let embedder = LocalEmbedder::load(&LocalModelConfig::default())?;
    /// # Ok::<(), refmetrics::Error>(())
    /// ```
    pub fn load(config: &LocalModelConfig) -> Result<Self> {
        let cache_dir = config.cache_dir.clone().unwrap_or_else(Self::cache_dir);
        let token = std::env::var("HF_TOKEN").ok();
        if token.is_some() {
            debug!("using HF_TOKEN for authentication");
        }

        let api = ApiBuilder::new()
            .with_cache_dir(cache_dir.join("hub"))
            .with_token(token)
            .with_progress(false)
            .build()
            .map_err(|e| Error::Embedding(format!("Failed to initialize HF Hub API: {}", e)))?;

        let repo = match &config.revision {
            Some(revision) => Repo::with_revision(
                config.model_id.clone(),
                RepoType::Model,
                revision.clone(),
            ),
            None => Repo::new(config.model_id.clone(), RepoType::Model),
        };
        let repo = api.repo(repo);

        info!(model = %config.model_id, "fetching model files");
        let config_path = repo
            .get("config.json")
            .map_err(|e| Error::Embedding(format!("Failed to download config.json: {}", e)))?;
        let tokenizer_path = repo
            .get("tokenizer.json")
            .map_err(|e| Error::Embedding(format!("Failed to download tokenizer.json: {}", e)))?;
        let weights_path = repo.get("model.safetensors").map_err(|e| {
            Error::Embedding(format!("Failed to download model.safetensors: {}", e))
        })?;

        let config_str = std::fs::read_to_string(&config_path)
            .map_err(|e| Error::Embedding(format!("Failed to read config: {}", e)))?;
        let bert_config: Config = serde_json::from_str(&config_str)
            .map_err(|e| Error::Embedding(format!("Failed to parse config: {}", e)))?;
        let dimension = bert_config.hidden_size;

        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| Error::Embedding(format!("Failed to load tokenizer: {}", e)))?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: config.max_sequence_length,
                ..Default::default()
            }))
            .map_err(|e| Error::Embedding(format!("Failed to configure truncation: {}", e)))?;
        tokenizer.with_padding(None);

        let device = Device::Cpu;

        // SAFETY: the weights file lives in the HF cache and is not modified
        // while mapped.
        let vb = unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], DTYPE, &device) }
            .map_err(|e| Error::Embedding(format!("Failed to load weights: {}", e)))?;
        let model = BertModel::load(vb, &bert_config)
            .map_err(|e| Error::Embedding(format!("Failed to create model: {}", e)))?;

        info!(model = %config.model_id, dimension, "local model loaded");

        Ok(LocalEmbedder {
            model,
            tokenizer,
            device,
            model_name: config.model_id.clone(),
            dimension,
        })
    }

    /// Get the HuggingFace cache root (HF_HOME, else the user cache dir)
    pub fn cache_dir() -> PathBuf {
        std::env::var("HF_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| dirs::cache_dir().map(|dir| dir.join("huggingface")))
            .unwrap_or_else(|| PathBuf::from(".cache").join("huggingface"))
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    fn mean_pooling(last_hidden_state: &Tensor, attention_mask: &Tensor) -> Result<Tensor> {
        let expanded_mask = attention_mask
            .unsqueeze(2)
            .and_then(|m| m.expand(last_hidden_state.shape()))
            .and_then(|m| m.to_dtype(last_hidden_state.dtype()))
            .map_err(|e| Error::Embedding(format!("Failed to expand mask: {}", e)))?;

        let sum_embeddings = (last_hidden_state * &expanded_mask)
            .and_then(|masked| masked.sum(1))
            .map_err(|e| Error::Embedding(format!("Failed to sum embeddings: {}", e)))?;

        // Clamp to avoid division by zero
        let sum_mask = expanded_mask
            .sum(1)
            .and_then(|s| s.clamp(1e-9, f32::MAX))
            .map_err(|e| Error::Embedding(format!("Failed to sum mask: {}", e)))?;

        sum_embeddings
            .broadcast_div(&sum_mask)
            .map_err(|e| Error::Embedding(format!("Failed to average: {}", e)))
    }

    fn normalize(tensor: &Tensor) -> Result<Tensor> {
        let norm = tensor
            .sqr()
            .and_then(|t| t.sum_keepdim(1))
            .and_then(|t| t.sqrt())
            .and_then(|t| t.clamp(1e-12, f32::MAX))
            .map_err(|e| Error::Embedding(format!("Failed to compute norm: {}", e)))?;

        tensor
            .broadcast_div(&norm)
            .map_err(|e| Error::Embedding(format!("Failed to normalize: {}", e)))
    }
}

impl Embedder for LocalEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| Error::Embedding(format!("Tokenization failed: {}", e)))?;

        let to_tensor = |ids: &[u32]| {
            Tensor::new(ids, &self.device)
                .and_then(|t| t.unsqueeze(0))
                .map_err(|e| Error::Embedding(format!("Failed to create input tensor: {}", e)))
        };
        let token_ids = to_tensor(encoding.get_ids())?;
        let token_type_ids = to_tensor(encoding.get_type_ids())?;
        let attention_mask = to_tensor(encoding.get_attention_mask())?;

        let outputs = self
            .model
            .forward(&token_ids, &token_type_ids, Some(&attention_mask))
            .map_err(|e| Error::Embedding(format!("Model forward failed: {}", e)))?;

        let pooled = Self::mean_pooling(&outputs, &attention_mask)?;
        let normalized = Self::normalize(&pooled)?;

        normalized
            .squeeze(0)
            .and_then(|t| t.to_vec1::<f32>())
            .map_err(|e| Error::Embedding(format!("Failed to convert to vec: {}", e)))
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
