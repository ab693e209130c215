//! # refmetrics
//!
//! Reference-based quality metrics for machine-generated text.
//!
//! Generated outputs are scored against reference outputs pair by pair,
//! either by lexical overlap (ROUGE) or by the cosine similarity of sentence
//! embeddings.
//!
//! ## Metrics
//!
//! - [`semantic_similarity`]: cosine similarity of embeddings from a local
//!   sentence encoder, OpenAI or Azure OpenAI, in [-1, 1]
//! - [`rouge1`] / [`rouge2`]: unigram / bigram overlap F1, in [0, 1]
//! - [`rouge_l`]: summary-level longest common subsequence F1, in [0, 1]
//!
//! Every metric returns a [`MetricValue`] that keeps the inputs next to the
//! per-pair scores.
//!
//! ## Example
//!
//! ```
//! use refmetrics::rouge1;
//!
//! let value = rouge1(
//!     vec!["the cat sat on the mat", "hello there"],
//!     vec!["the cat sat on a mat", "general kenobi"],
//!     None,
//! )?;
//! assert_eq!(value.metric_values().len(), 2);
//! assert_eq!(value.metric_values()[1], 0.0);
//! # Ok::<(), refmetrics::Error>(())
//! ```

pub mod config;
pub mod embedding;
pub mod metrics;
pub mod rouge;
pub mod similarity;
pub mod validation;

mod error;
mod metric_value;

pub use config::MetricsConfig;
pub use embedding::{Embedder, EmbeddingArgs, EmbeddingBackend, EmbeddingClient, MockEmbedder};
pub use error::{Error, Result};
pub use metric_value::{MetricRecord, MetricValue};
pub use metrics::{
    rouge1, rouge2, rouge_l, semantic_similarity, semantic_similarity_with, SimilarityOptions,
    LANGUAGE,
};
pub use validation::TextInput;
