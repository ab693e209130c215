//! Reference-based text quality metrics
//!
//! Each metric compares generated outputs with reference outputs pair by
//! pair and returns a [`MetricValue`]. Inputs are validated before any model
//! is loaded or any request is sent, and an empty batch returns an empty
//! result without touching a backend.

use crate::config::MetricsConfig;
use crate::embedding::{
    create_embedder, Embedder, EmbeddingArgs, EmbeddingBackend, EmbeddingClient,
};
use crate::rouge::{self, RougeType};
use crate::similarity::pairwise_cosine_similarity;
use crate::validation::{validate_reference_based, ReferenceBasedInputs, TextInput};
use crate::{MetricValue, Result};
use std::sync::Arc;
use tracing::debug;

/// Language tag attached to every metric in this module
pub const LANGUAGE: &str = "en";

/// How `semantic_similarity` obtains its embeddings
#[derive(Clone, Default)]
pub struct SimilarityOptions {
    /// Backend to embed with (default: local)
    pub backend: EmbeddingBackend,
    /// Pre-configured client for the remote backends; built from the
    /// environment when absent
    pub client: Option<Arc<dyn EmbeddingClient>>,
    /// Args forwarded to the remote embeddings call; Azure requires `model`
    pub embedding_args: Option<EmbeddingArgs>,
    pub config: MetricsConfig,
}

impl SimilarityOptions {
    /// Options for `backend`, parsed from its tag (`local`, `openai`,
    /// `azure_openai`)
    pub fn for_backend(backend: &str) -> Result<Self> {
        Ok(SimilarityOptions {
            backend: backend.parse()?,
            ..Default::default()
        })
    }

    /// Options taking backend and embedding args from a loaded config
    pub fn from_config(config: MetricsConfig) -> Self {
        SimilarityOptions {
            backend: config.backend,
            client: None,
            embedding_args: config.embedding_args.clone(),
            config,
        }
    }

    pub fn with_backend(mut self, backend: EmbeddingBackend) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_client(mut self, client: Arc<dyn EmbeddingClient>) -> Self {
        self.client = Some(client);
        self
    }

    pub fn with_embedding_args(mut self, args: EmbeddingArgs) -> Self {
        self.embedding_args = Some(args);
        self
    }
}

fn empty_result(metric_name: &str, inputs: ReferenceBasedInputs) -> Result<MetricValue> {
    MetricValue::new(metric_name, inputs, Vec::new(), LANGUAGE)
}

/// Cosine similarity between generated and reference embeddings
///
/// Values lie in [-1, 1] and typically range between 0 and 1. Remote
/// embeddings tend to skew towards the high end. Prompts are kept as
/// metadata only.
///
/// # Example
/// ```no_run
/// use refmetrics::metrics::{semantic_similarity, SimilarityOptions};
///
/// let value = semantic_similarity(
///     "The cat sat on the mat.",
///     "A cat was sitting on the mat.",
///     None,
///     &SimilarityOptions::default(),
/// )?;
/// assert!(value.metric_values()[0] > 0.5);
/// # Ok::<(), refmetrics::Error>(())
/// ```
pub fn semantic_similarity(
    generated_outputs: impl Into<TextInput>,
    reference_outputs: impl Into<TextInput>,
    prompts: Option<TextInput>,
    options: &SimilarityOptions,
) -> Result<MetricValue> {
    let inputs =
        validate_reference_based(generated_outputs.into(), reference_outputs.into(), prompts)?;
    options.backend.check_args(options.embedding_args.as_ref())?;

    if inputs.is_empty() {
        return empty_result("semantic_similarity", inputs);
    }

    let embedder = create_embedder(
        options.backend,
        options.client.clone(),
        options.embedding_args.clone(),
        &options.config,
    )?;
    score_semantic_similarity(inputs, embedder.as_ref())
}

/// [`semantic_similarity`] with a caller-owned embedder
///
/// Use this to load a local model once and reuse it across calls.
pub fn semantic_similarity_with(
    generated_outputs: impl Into<TextInput>,
    reference_outputs: impl Into<TextInput>,
    prompts: Option<TextInput>,
    embedder: &dyn Embedder,
) -> Result<MetricValue> {
    let inputs =
        validate_reference_based(generated_outputs.into(), reference_outputs.into(), prompts)?;
    if inputs.is_empty() {
        return empty_result("semantic_similarity", inputs);
    }
    score_semantic_similarity(inputs, embedder)
}

fn score_semantic_similarity(
    inputs: ReferenceBasedInputs,
    embedder: &dyn Embedder,
) -> Result<MetricValue> {
    debug!(
        model = embedder.model_name(),
        pairs = inputs.len(),
        "computing semantic similarity"
    );

    let generated = embedder.embed_batch(&as_refs(&inputs.generated_outputs))?;
    let reference = embedder.embed_batch(&as_refs(&inputs.reference_outputs))?;
    let scores = pairwise_cosine_similarity(&generated, &reference)?;

    MetricValue::new("semantic_similarity", inputs, scores, LANGUAGE)
}

fn as_refs(texts: &[String]) -> Vec<&str> {
    texts.iter().map(String::as_str).collect()
}

fn rouge_metric(
    metric_name: &str,
    rouge_type: RougeType,
    generated_outputs: TextInput,
    reference_outputs: TextInput,
    prompts: Option<TextInput>,
) -> Result<MetricValue> {
    let inputs = validate_reference_based(generated_outputs, reference_outputs, prompts)?;
    if inputs.is_empty() {
        return empty_result(metric_name, inputs);
    }

    debug!(metric = metric_name, pairs = inputs.len(), "computing ROUGE");
    let scores = rouge::pairwise_fmeasure(
        rouge_type,
        &inputs.generated_outputs,
        &inputs.reference_outputs,
    );
    MetricValue::new(metric_name, inputs, scores, LANGUAGE)
}

/// F1 of ROUGE-1: unigram overlap, in [0, 1]
pub fn rouge1(
    generated_outputs: impl Into<TextInput>,
    reference_outputs: impl Into<TextInput>,
    prompts: Option<TextInput>,
) -> Result<MetricValue> {
    rouge_metric(
        "rouge1",
        RougeType::Rouge1,
        generated_outputs.into(),
        reference_outputs.into(),
        prompts,
    )
}

/// F1 of ROUGE-2: bigram overlap, in [0, 1]
pub fn rouge2(
    generated_outputs: impl Into<TextInput>,
    reference_outputs: impl Into<TextInput>,
    prompts: Option<TextInput>,
) -> Result<MetricValue> {
    rouge_metric(
        "rouge2",
        RougeType::Rouge2,
        generated_outputs.into(),
        reference_outputs.into(),
        prompts,
    )
}

/// F1 of ROUGE-L: longest common subsequence, in [0, 1]
///
/// Uses the summary-level variant, where newlines separate sentences. This
/// matches the original perl ROUGE script rather than the sentence-level
/// default of most libraries.
pub fn rouge_l(
    generated_outputs: impl Into<TextInput>,
    reference_outputs: impl Into<TextInput>,
    prompts: Option<TextInput>,
) -> Result<MetricValue> {
    rouge_metric(
        "rougeL",
        RougeType::RougeLsum,
        generated_outputs.into(),
        reference_outputs.into(),
        prompts,
    )
}
