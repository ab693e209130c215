//! Pluggable embedding backends
//!
//! Every backend implements [`Embedder`]. [`create_embedder`] picks the
//! implementation for an [`EmbeddingBackend`] tag.

mod backend;
mod mock;
mod traits;

#[cfg(feature = "hf-embeddings")]
mod local;

#[cfg(feature = "api-embeddings")]
mod remote;

pub use backend::{create_embedder, default_client, EmbeddingBackend, RemoteEmbedder};
pub use mock::MockEmbedder;
pub use traits::{Embedder, EmbeddingArgs, EmbeddingClient};

#[cfg(feature = "hf-embeddings")]
pub use local::LocalEmbedder;

#[cfg(feature = "api-embeddings")]
pub use remote::{AzureOpenAIClient, OpenAIClient};
