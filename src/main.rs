//! refmetrics CLI - score generated text against references
//!
//! Reads generated/reference pairs from a JSON file and prints the resulting
//! metric value.

use clap::{Parser, Subcommand};
use refmetrics::{
    rouge1, rouge2, rouge_l, semantic_similarity, semantic_similarity_with, EmbeddingArgs,
    MetricValue, MetricsConfig, MockEmbedder, SimilarityOptions, TextInput,
};
use serde::Deserialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "refmetrics")]
#[command(about = "Reference-based quality metrics for generated text")]
#[command(version)]
struct Cli {
    /// JSON file with `generated`, `reference` and optional `prompts` lists
    #[arg(short, long)]
    input: PathBuf,

    /// Output format (json or text)
    #[arg(short, long, default_value = "json")]
    format: OutputFormat,

    /// Optional JSON config file (backend, embedding args, local model)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Subcommand)]
enum Commands {
    /// Cosine similarity of sentence embeddings
    SemanticSimilarity {
        /// Embedding backend: local, openai or azure_openai
        #[arg(short, long)]
        backend: Option<String>,
        /// JSON object forwarded to the embeddings API, e.g. '{"model": "my-deployment"}'
        #[arg(long)]
        embedding_args: Option<String>,
        /// Use deterministic hash embeddings instead of a real model
        #[arg(long)]
        mock: bool,
    },

    /// ROUGE-1 F1 (unigram overlap)
    Rouge1,

    /// ROUGE-2 F1 (bigram overlap)
    Rouge2,

    /// ROUGE-L F1 (summary-level longest common subsequence)
    RougeL,
}

#[derive(Deserialize)]
struct PairsFile {
    generated: Vec<String>,
    reference: Vec<String>,
    #[serde(default)]
    prompts: Option<Vec<String>>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let content = std::fs::read_to_string(&cli.input)?;
    let pairs: PairsFile = serde_json::from_str(&content)?;
    let prompts = pairs.prompts.map(TextInput::from);

    let value = match cli.command {
        Commands::SemanticSimilarity {
            backend,
            embedding_args,
            mock,
        } => {
            if mock {
                semantic_similarity_with(
                    pairs.generated,
                    pairs.reference,
                    prompts,
                    &MockEmbedder::default(),
                )?
            } else {
                let options = similarity_options(cli.config.as_ref(), backend, embedding_args)?;
                semantic_similarity(pairs.generated, pairs.reference, prompts, &options)?
            }
        }
        Commands::Rouge1 => rouge1(pairs.generated, pairs.reference, prompts)?,
        Commands::Rouge2 => rouge2(pairs.generated, pairs.reference, prompts)?,
        Commands::RougeL => rouge_l(pairs.generated, pairs.reference, prompts)?,
    };

    output(cli.format, &value)
}

fn similarity_options(
    config_path: Option<&PathBuf>,
    backend: Option<String>,
    embedding_args: Option<String>,
) -> anyhow::Result<SimilarityOptions> {
    let config = match config_path {
        Some(path) => MetricsConfig::load(path)?,
        None => MetricsConfig::default(),
    };

    let mut options = SimilarityOptions::from_config(config);
    if let Some(backend) = backend {
        options = options.with_backend(backend.parse()?);
    }
    if let Some(raw) = embedding_args {
        let args: EmbeddingArgs = serde_json::from_str(&raw)
            .map_err(|e| anyhow::anyhow!("Invalid --embedding-args: {}", e))?;
        options = options.with_embedding_args(args);
    }
    Ok(options)
}

fn output(format: OutputFormat, value: &MetricValue) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(value)?),
        OutputFormat::Text => print!("{}", value),
    }
    Ok(())
}
