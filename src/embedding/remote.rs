//! HTTP clients for OpenAI-compatible embedding APIs
//!
//! Both clients are blocking and make exactly one request per call. Failures
//! are not retried.

use super::{EmbeddingArgs, EmbeddingClient};
use crate::config::{AzureOpenAIConfig, OpenAIConfig};
use crate::{Error, Result};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Deserialize)]
struct EmbeddingItem {
    embedding: Vec<f32>,
    #[serde(default)]
    index: Option<usize>,
}

fn http_client(timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| Error::Configuration(format!("Failed to build HTTP client: {}", e)))
}

fn request_body(input: &[String], args: &EmbeddingArgs) -> serde_json::Value {
    let mut body = args.clone();
    body.insert("input".to_string(), serde_json::json!(input));
    serde_json::Value::Object(body)
}

/// Send an embeddings request and return the vectors in input order
fn send(request: RequestBuilder, input: &[String], args: &EmbeddingArgs) -> Result<Vec<Vec<f32>>> {
    let response = request
        .header("Content-Type", "application/json")
        .json(&request_body(input, args))
        .send()
        .map_err(|e| Error::RemoteProvider(format!("API request failed: {}", e)))?;

    let status = response.status();
    let body = response
        .text()
        .map_err(|e| Error::RemoteProvider(format!("Failed to read response body: {}", e)))?;
    parse_response(status, &body, input.len())
}

fn parse_response(status: StatusCode, body: &str, expected: usize) -> Result<Vec<Vec<f32>>> {
    if !status.is_success() {
        return Err(Error::RemoteProvider(format!(
            "API request failed with status {}: {}",
            status, body
        )));
    }

    let parsed: EmbeddingResponse = serde_json::from_str(body)
        .map_err(|e| Error::RemoteProvider(format!("Failed to parse response: {}", e)))?;
    ordered_embeddings(parsed, expected)
}

/// Put the returned vectors back in input order
///
/// Indices, when the provider sends them, must be a permutation of
/// `0..expected`. Without indices the response order is kept.
fn ordered_embeddings(response: EmbeddingResponse, expected: usize) -> Result<Vec<Vec<f32>>> {
    if response.data.len() != expected {
        return Err(Error::RemoteProvider(format!(
            "Expected {} embeddings, got {}",
            expected,
            response.data.len()
        )));
    }

    if response.data.iter().all(|item| item.index.is_none()) {
        return Ok(response.data.into_iter().map(|item| item.embedding).collect());
    }

    let mut slots: Vec<Option<Vec<f32>>> = vec![None; expected];
    for item in response.data {
        let index = item.index.ok_or_else(|| {
            Error::RemoteProvider("Response mixes indexed and unindexed embeddings".to_string())
        })?;
        let slot = slots.get_mut(index).ok_or_else(|| {
            Error::RemoteProvider(format!(
                "Embedding index {} out of range for {} inputs",
                index, expected
            ))
        })?;
        if slot.is_some() {
            return Err(Error::RemoteProvider(format!(
                "Duplicate embedding index {}",
                index
            )));
        }
        *slot = Some(item.embedding);
    }

    // Every slot is filled: `expected` distinct in-range indices were placed
    Ok(slots.into_iter().flatten().collect())
}

/// Client for the OpenAI embeddings endpoint (or any compatible proxy)
pub struct OpenAIClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OpenAIClient {
    pub fn new(config: OpenAIConfig, timeout_secs: u64) -> Result<Self> {
        Ok(OpenAIClient {
            client: http_client(timeout_secs)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
        })
    }

    /// Build a client from `OPENAI_API_KEY` / `OPENAI_BASE_URL`
    pub fn from_env(timeout_secs: u64) -> Result<Self> {
        Self::new(OpenAIConfig::from_env()?, timeout_secs)
    }
}

impl EmbeddingClient for OpenAIClient {
    fn create_embeddings(
        &self,
        input: &[String],
        args: &EmbeddingArgs,
    ) -> Result<Vec<Vec<f32>>> {
        let url = format!("{}/embeddings", self.base_url);
        debug!(%url, count = input.len(), "requesting OpenAI embeddings");
        let request = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key));
        send(request, input, args)
    }
}

/// Client for an Azure OpenAI resource
///
/// The deployment is taken from the `model` entry of the embedding args.
pub struct AzureOpenAIClient {
    client: Client,
    endpoint: String,
    api_key: String,
    api_version: String,
}

impl AzureOpenAIClient {
    pub fn new(config: AzureOpenAIConfig, timeout_secs: u64) -> Result<Self> {
        Ok(AzureOpenAIClient {
            client: http_client(timeout_secs)?,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key: config.api_key,
            api_version: config.api_version,
        })
    }

    /// Build a client from `AZURE_OPENAI_KEY`, `OPENAI_API_VERSION` and
    /// `AZURE_OPENAI_ENDPOINT`
    pub fn from_env(timeout_secs: u64) -> Result<Self> {
        Self::new(AzureOpenAIConfig::from_env()?, timeout_secs)
    }

    fn url(&self, deployment: &str) -> String {
        format!(
            "{}/openai/deployments/{}/embeddings?api-version={}",
            self.endpoint, deployment, self.api_version
        )
    }
}

impl EmbeddingClient for AzureOpenAIClient {
    fn create_embeddings(
        &self,
        input: &[String],
        args: &EmbeddingArgs,
    ) -> Result<Vec<Vec<f32>>> {
        let deployment = super::backend::deployment(args)?;
        let url = self.url(deployment);
        debug!(%url, count = input.len(), "requesting Azure OpenAI embeddings");
        let request = self.client.post(&url).header("api-key", &self.api_key);
        send(request, input, args)
    }
}
