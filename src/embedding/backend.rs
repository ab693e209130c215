//! Backend selection
//!
//! [`EmbeddingBackend`] names the three supported providers and
//! [`create_embedder`] turns a tag (plus an optional injected client) into a
//! ready [`Embedder`].

use super::{Embedder, EmbeddingArgs, EmbeddingClient};
use crate::config::{MetricsConfig, DEFAULT_OPENAI_EMBEDDING_MODEL};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// Embedding provider type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EmbeddingBackend {
    /// Sentence encoder run in-process with Candle
    #[default]
    Local,
    /// OpenAI embeddings API
    OpenAI,
    /// Azure OpenAI deployment
    AzureOpenAI,
}

impl EmbeddingBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmbeddingBackend::Local => "local",
            EmbeddingBackend::OpenAI => "openai",
            EmbeddingBackend::AzureOpenAI => "azure_openai",
        }
    }

    pub fn is_remote(&self) -> bool {
        !matches!(self, EmbeddingBackend::Local)
    }

    /// Check backend-specific settings without touching the network
    ///
    /// Azure needs the deployment name in the `model` entry of `args`.
    pub fn check_args(&self, args: Option<&EmbeddingArgs>) -> Result<()> {
        if *self == EmbeddingBackend::AzureOpenAI {
            deployment(args.ok_or_else(missing_deployment)?)?;
        }
        Ok(())
    }
}

impl fmt::Display for EmbeddingBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmbeddingBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "local" => Ok(EmbeddingBackend::Local),
            "openai" => Ok(EmbeddingBackend::OpenAI),
            "azure_openai" => Ok(EmbeddingBackend::AzureOpenAI),
            other => Err(Error::UnsupportedBackend(other.to_string())),
        }
    }
}

impl TryFrom<String> for EmbeddingBackend {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<EmbeddingBackend> for String {
    fn from(backend: EmbeddingBackend) -> Self {
        backend.as_str().to_string()
    }
}

fn missing_deployment() -> Error {
    Error::Configuration(
        "The embedding model deployment must be specified in the embedding args for the \
         azure_openai backend, e.g. {\"model\": \"YOUR_DEPLOYMENT_NAME\"}"
            .to_string(),
    )
}

/// The deployment (or model) named by `args`
pub(crate) fn deployment(args: &EmbeddingArgs) -> Result<&str> {
    args.get("model")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(missing_deployment)
}

/// Embedder that delegates to an [`EmbeddingClient`] with fixed args
pub struct RemoteEmbedder {
    client: Arc<dyn EmbeddingClient>,
    args: EmbeddingArgs,
    model_name: String,
}

impl RemoteEmbedder {
    /// Wrap `client`; without args the default OpenAI embedding model is used
    pub fn new(client: Arc<dyn EmbeddingClient>, args: Option<EmbeddingArgs>) -> Self {
        let args = args.unwrap_or_else(|| {
            let mut args = EmbeddingArgs::new();
            args.insert(
                "model".to_string(),
                serde_json::Value::String(DEFAULT_OPENAI_EMBEDDING_MODEL.to_string()),
            );
            args
        });
        let model_name = args
            .get("model")
            .and_then(|v| v.as_str())
            .unwrap_or("unspecified")
            .to_string();

        RemoteEmbedder {
            client,
            args,
            model_name,
        }
    }
}

impl Embedder for RemoteEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_batch(&[text])?
            .into_iter()
            .next()
            .ok_or_else(|| Error::RemoteProvider("No embedding returned from API".to_string()))
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let input: Vec<String> = texts.iter().map(|s| s.to_string()).collect();
        let embeddings = self.client.create_embeddings(&input, &self.args)?;

        if embeddings.len() != input.len() {
            return Err(Error::RemoteProvider(format!(
                "Expected {} embeddings, got {}",
                input.len(),
                embeddings.len()
            )));
        }
        Ok(embeddings)
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

/// Build the default client of a remote backend from environment credentials
pub fn default_client(
    backend: EmbeddingBackend,
    config: &MetricsConfig,
) -> Result<Arc<dyn EmbeddingClient>> {
    debug!(%backend, "building default embedding client from environment");
    match backend {
        EmbeddingBackend::Local => Err(Error::Configuration(
            "The local backend does not use a remote client".to_string(),
        )),
        #[cfg(feature = "api-embeddings")]
        EmbeddingBackend::OpenAI => Ok(Arc::new(super::OpenAIClient::from_env(
            config.request_timeout_secs,
        )?)),
        #[cfg(feature = "api-embeddings")]
        EmbeddingBackend::AzureOpenAI => Ok(Arc::new(super::AzureOpenAIClient::from_env(
            config.request_timeout_secs,
        )?)),
        #[cfg(not(feature = "api-embeddings"))]
        EmbeddingBackend::OpenAI | EmbeddingBackend::AzureOpenAI => {
            let _ = config;
            Err(Error::Configuration(
                "API embeddings feature not enabled. Compile with --features api-embeddings"
                    .to_string(),
            ))
        }
    }
}

/// Build the embedder for `backend`
///
/// Remote backends use `client` when given, otherwise a default client built
/// from the environment. Backend settings are checked first, so a missing
/// Azure deployment fails before any client exists.
pub fn create_embedder(
    backend: EmbeddingBackend,
    client: Option<Arc<dyn EmbeddingClient>>,
    args: Option<EmbeddingArgs>,
    config: &MetricsConfig,
) -> Result<Box<dyn Embedder>> {
    backend.check_args(args.as_ref())?;

    match backend {
        EmbeddingBackend::Local => local_embedder(config),
        EmbeddingBackend::OpenAI | EmbeddingBackend::AzureOpenAI => {
            let client = match client {
                Some(client) => client,
                None => default_client(backend, config)?,
            };
            Ok(Box::new(RemoteEmbedder::new(client, args)))
        }
    }
}

#[cfg(feature = "hf-embeddings")]
fn local_embedder(config: &MetricsConfig) -> Result<Box<dyn Embedder>> {
    Ok(Box::new(super::LocalEmbedder::load(&config.local_model)?))
}

#[cfg(not(feature = "hf-embeddings"))]
fn local_embedder(_config: &MetricsConfig) -> Result<Box<dyn Embedder>> {
    Err(Error::Embedding(
        "HF embeddings feature not enabled. Compile with --features hf-embeddings".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Records every request and answers with one short vector per input
    #[derive(Default)]
    struct RecordingClient {
        calls: AtomicUsize,
        last_args: Mutex<Option<EmbeddingArgs>>,
        drop_last: bool,
    }

    impl EmbeddingClient for RecordingClient {
        fn create_embeddings(
            &self,
            input: &[String],
            args: &EmbeddingArgs,
        ) -> Result<Vec<Vec<f32>>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_args.lock().unwrap() = Some(args.clone());
            let n = if self.drop_last { input.len() - 1 } else { input.len() };
            Ok((0..n).map(|i| vec![i as f32, 1.0]).collect())
        }
    }

    fn args(model: &str) -> EmbeddingArgs {
        let mut args = EmbeddingArgs::new();
        args.insert("model".into(), serde_json::json!(model));
        args
    }

    #[test]
    fn test_backend_tags() {
        for tag in ["local", "openai", "azure_openai"] {
            let backend: EmbeddingBackend = tag.parse().unwrap();
            assert_eq!(backend.to_string(), tag);
        }
        assert!(!EmbeddingBackend::Local.is_remote());
        assert!(EmbeddingBackend::AzureOpenAI.is_remote());
    }

    #[test]
    fn test_unknown_backend_is_unsupported() {
        let err = "cohere".parse::<EmbeddingBackend>().unwrap_err();
        assert!(matches!(err, Error::UnsupportedBackend(tag) if tag == "cohere"));
    }

    #[test]
    fn test_azure_requires_deployment() {
        let backend = EmbeddingBackend::AzureOpenAI;
        assert!(matches!(backend.check_args(None), Err(Error::Configuration(_))));
        assert!(matches!(
            backend.check_args(Some(&EmbeddingArgs::new())),
            Err(Error::Configuration(_))
        ));
        assert!(matches!(
            backend.check_args(Some(&args(""))),
            Err(Error::Configuration(_))
        ));
        assert!(backend.check_args(Some(&args("embed-prod"))).is_ok());
        assert!(EmbeddingBackend::OpenAI.check_args(None).is_ok());
    }

    #[test]
    fn test_create_embedder_azure_without_deployment_never_calls_client() {
        let client = Arc::new(RecordingClient::default());
        let result = create_embedder(
            EmbeddingBackend::AzureOpenAI,
            Some(client.clone()),
            None,
            &MetricsConfig::default(),
        );

        assert!(matches!(result, Err(Error::Configuration(_))));
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_remote_embedder_defaults_model() {
        let client = Arc::new(RecordingClient::default());
        let embedder = RemoteEmbedder::new(client.clone(), None);

        let vectors = embedder.embed_batch(&["a", "b"]).unwrap();
        assert_eq!(vectors.len(), 2);
        assert_eq!(embedder.model_name(), DEFAULT_OPENAI_EMBEDDING_MODEL);
        assert_eq!(
            client.last_args.lock().unwrap().as_ref().unwrap()["model"],
            serde_json::json!(DEFAULT_OPENAI_EMBEDDING_MODEL)
        );
    }

    #[test]
    fn test_remote_embedder_forwards_args_verbatim() {
        let client = Arc::new(RecordingClient::default());
        let mut custom = args("text-embedding-3-large");
        custom.insert("dimensions".into(), serde_json::json!(64));
        let embedder = RemoteEmbedder::new(client.clone(), Some(custom.clone()));

        embedder.embed("hello").unwrap();
        assert_eq!(client.last_args.lock().unwrap().as_ref(), Some(&custom));
    }

    #[test]
    fn test_remote_embedder_rejects_short_response() {
        let client = Arc::new(RecordingClient {
            drop_last: true,
            ..Default::default()
        });
        let embedder = RemoteEmbedder::new(client, None);

        let err = embedder.embed_batch(&["a", "b", "c"]).unwrap_err();
        assert!(matches!(err, Error::RemoteProvider(_)));
    }

    #[test]
    fn test_default_client_rejects_local() {
        let err = default_client(EmbeddingBackend::Local, &MetricsConfig::default());
        assert!(matches!(err, Err(Error::Configuration(_))));
    }
}
