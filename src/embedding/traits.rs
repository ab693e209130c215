//! Embedding trait definitions

use crate::Result;

/// Extra arguments forwarded verbatim into a remote embeddings request body
/// (e.g. `{"model": "text-embedding-3-small"}`)
pub type EmbeddingArgs = serde_json::Map<String, serde_json::Value>;

/// Trait for generating embeddings from text
///
/// Implementations can use:
/// - Local models (BERT-compatible sentence-transformers via Candle)
/// - Remote APIs (OpenAI, Azure OpenAI)
/// - Mock implementations for testing
pub trait Embedder: Send + Sync {
    /// Generate an embedding for the given text
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for multiple texts (batch)
    /// Default implementation calls embed() for each text
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }

    /// Get the model name/identifier
    fn model_name(&self) -> &str;
}

/// A client for an OpenAI-compatible `embeddings.create` endpoint
///
/// The remote backends only depend on this trait, so callers can inject a
/// pre-configured client or a test double.
pub trait EmbeddingClient: Send + Sync {
    /// Embed `input` in one request; `args` are merged into the request body
    ///
    /// Returns one vector per input, in input order.
    fn create_embeddings(&self, input: &[String], args: &EmbeddingArgs)
        -> Result<Vec<Vec<f32>>>;
}
