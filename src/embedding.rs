//! Embedding providers.
//!
//! - `OpenAiEmbedder` calls an OpenAI-compatible `/embeddings` endpoint.
//! - `MockEmbedder` derives deterministic unit vectors from a hash of the
//!   input text, for tests and offline use.
//!
//! The store never calls a provider itself; vectors are embedded first and
//! inserted afterwards.

use std::collections::hash_map::DefaultHasher;
use std::future::Future;
use std::hash::{Hash, Hasher};
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EmbeddingDbError, Result};
use crate::vector::Vector;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "text-embedding-ada-002";
/// Output width of `text-embedding-ada-002`.
pub const DEFAULT_DIMENSION: usize = 1536;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Turns text into a fixed-dimension vector.
pub trait Embedder: Send + Sync {
    /// Embed a single piece of text.
    fn embed(&self, text: &str) -> impl Future<Output = Result<Vector>> + Send;

    /// Length of every vector this embedder returns.
    fn dimension(&self) -> usize;
}

/// Settings for an OpenAI-compatible embedding endpoint.
#[derive(Debug, Clone)]
pub struct EmbedderConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub dimension: usize,
    pub timeout: Duration,
    /// Optional end-user identifier forwarded to the provider.
    pub user: Option<String>,
}

impl EmbedderConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            dimension: DEFAULT_DIMENSION,
            timeout: DEFAULT_TIMEOUT,
            user: None,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/embeddings", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
    #[serde(default)]
    model: String,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    #[serde(default)]
    index: usize,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    total_tokens: u32,
}

impl EmbeddingResponse {
    /// Pull the first embedding out and check its length.
    fn into_vector(self, expected: usize) -> Result<Vector> {
        let first = self
            .data
            .into_iter()
            .min_by_key(|d| d.index)
            .ok_or_else(|| {
                EmbeddingDbError::Embedding("response contained no embeddings".to_string())
            })?;

        if first.embedding.len() != expected {
            return Err(EmbeddingDbError::DimensionMismatch {
                expected,
                actual: first.embedding.len(),
            });
        }
        Ok(Vector::from_f32(&first.embedding))
    }
}

/// Embedder backed by an OpenAI-compatible HTTP API.
#[derive(Debug, Clone)]
pub struct OpenAiEmbedder {
    client: Client,
    config: EmbedderConfig,
}

impl OpenAiEmbedder {
    pub fn new(config: EmbedderConfig) -> Result<Self> {
        if config.dimension == 0 {
            return Err(EmbeddingDbError::InvalidDimension { dim: 0 });
        }
        if config.api_key.trim().is_empty() {
            return Err(EmbeddingDbError::Embedding("API key is empty".to_string()));
        }
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &EmbedderConfig {
        &self.config
    }
}

impl Embedder for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vector> {
        let request = EmbeddingRequest {
            model: &self.config.model,
            input: text,
            user: self.config.user.as_deref(),
        };

        let response = self
            .client
            .post(self.config.endpoint())
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, format!("Bearer {}", self.config.api_key))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingDbError::Embedding(format!(
                "status {}: {}",
                status, body
            )));
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingDbError::Embedding(format!("invalid response: {}", e)))?;

        if let Some(usage) = &parsed.usage {
            debug!(
                model = %parsed.model,
                prompt_tokens = usage.prompt_tokens,
                total_tokens = usage.total_tokens,
                "embedding created"
            );
        }

        parsed.into_vector(self.config.dimension)
    }

    fn dimension(&self) -> usize {
        self.config.dimension
    }
}

/// Deterministic embedder: identical text always yields the identical unit
/// vector.
#[derive(Debug, Clone)]
pub struct MockEmbedder {
    dimension: usize,
}

impl MockEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn hash_to_vector(&self, text: &str) -> Vec<f64> {
        let mut result: Vec<f64> = (0..self.dimension)
            .map(|i| {
                let mut hasher = DefaultHasher::new();
                text.hash(&mut hasher);
                i.hash(&mut hasher);
                let h = hasher.finish();
                ((h as f64) / (u64::MAX as f64)) * 2.0 - 1.0
            })
            .collect();

        let norm = result.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for v in &mut result {
                *v /= norm;
            }
        }
        result
    }
}

impl Embedder for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vector> {
        Ok(Vector::new(self.hash_to_vector(text)))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
