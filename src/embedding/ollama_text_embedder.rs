//! Ollama API-based text embedder.
//!
//! Talks to the `/api/embed` endpoint of a running Ollama server.

use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::OllamaConfig;
use crate::embedding::embedder::Embedder;
use crate::error::{Result, TandemError};
use crate::vector::vector::Vector;

/// Request body for `POST /api/embed`.
#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
}

/// Response body of `POST /api/embed`.
#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

/// Text embedder backed by a local Ollama server.
///
/// The output dimension is learned from the first response and every later
/// response is checked against it.
///
/// # Examples
///
/// ```no_run
/// use tandem::config::OllamaConfig;
/// use tandem::embedding::embedder::Embedder;
/// use tandem::embedding::ollama_text_embedder::OllamaTextEmbedder;
///
/// # async fn example() -> tandem::error::Result<()> {
/// let embedder = OllamaTextEmbedder::new(&OllamaConfig::default())?;
/// let vector = embedder.embed("dogs chase cats").await?;
/// println!("Embedding dimension: {}", vector.dimension());
/// # Ok(())
/// # }
/// ```
pub struct OllamaTextEmbedder {
    /// HTTP client for making API requests.
    client: Client,
    /// Full URL of the embed endpoint.
    endpoint: String,
    /// Model name, e.g. "llama3.2:1b".
    model: String,
    /// Output dimension, set on the first successful response.
    dimension: OnceLock<usize>,
}

impl OllamaTextEmbedder {
    /// Create an embedder from the Ollama settings.
    pub fn new(config: &OllamaConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint("/api/embed"),
            model: config.embedding_model().to_string(),
            dimension: OnceLock::new(),
        })
    }

    async fn request(&self, input: Vec<&str>) -> Result<Vec<Vec<f32>>> {
        let expected = input.len();
        let request = EmbedRequest {
            model: &self.model,
            input,
        };

        let http_response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| TandemError::embedding(format!("Ollama API request failed: {e}")))?;

        let status = http_response.status();
        let response_text = http_response.text().await.map_err(|e| {
            TandemError::embedding(format!("Failed to read response text: {e}"))
        })?;

        if !status.is_success() {
            return Err(TandemError::embedding(format!(
                "Ollama API error (status {status}): {response_text}"
            )));
        }

        let embeddings = parse_response(&response_text)?;
        if embeddings.len() != expected {
            return Err(TandemError::embedding(format!(
                "Expected {expected} embeddings, got {}",
                embeddings.len()
            )));
        }

        for embedding in &embeddings {
            let dimension = *self.dimension.get_or_init(|| embedding.len());
            if embedding.len() != dimension {
                return Err(TandemError::embedding(format!(
                    "Inconsistent embedding dimension: expected {dimension}, got {}",
                    embedding.len()
                )));
            }
        }

        debug!(
            "Embedded {} texts with {} (dimension {:?})",
            expected,
            self.model,
            self.dimension.get()
        );
        Ok(embeddings)
    }
}

fn parse_response(response_text: &str) -> Result<Vec<Vec<f32>>> {
    let response: EmbedResponse = serde_json::from_str(response_text).map_err(|e| {
        TandemError::embedding(format!(
            "Failed to parse Ollama response: {e}. Response text: {response_text}"
        ))
    })?;
    Ok(response.embeddings)
}

#[async_trait]
impl Embedder for OllamaTextEmbedder {
    async fn embed(&self, text: &str) -> Result<Vector> {
        let embedding = self
            .request(vec![text])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| TandemError::embedding("No embedding in response"))?;

        Ok(Vector::new(embedding))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vector>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let embeddings = self.request(texts.to_vec()).await?;
        Ok(embeddings.into_iter().map(Vector::new).collect())
    }

    fn dimension(&self) -> Option<usize> {
        self.dimension.get().copied()
    }

    fn name(&self) -> &str {
        &self.model
    }
}
