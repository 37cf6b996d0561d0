//! Top-level configuration.
//!
//! [`TandemConfig`] bundles everything the binary needs to assemble the
//! retrieval stack. Every section has defaults, so a config file only needs
//! the fields it changes:
//!
//! ```json
//! {
//!   "lexical_weight": 0.7,
//!   "vector_weight": 0.3,
//!   "fusion": { "normalization": { "type": "reciprocal_rank", "k": 60.0 } },
//!   "ollama": { "model": "llama3.2:1b" }
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TandemError};
use crate::hybrid::config::FusionConfig;
use crate::lexical::bm25::Bm25Params;
use crate::vector::distance::DistanceMetric;

/// Connection settings for a local Ollama server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    /// Base URL of the server.
    pub base_url: String,
    /// Chat model name.
    pub model: String,
    /// Embedding model name. Falls back to `model` when unset.
    pub embedding_model: Option<String>,
    /// HTTP request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        OllamaConfig {
            base_url: "http://localhost:11434".to_string(),
            model: "llama3.2:1b".to_string(),
            embedding_model: None,
            request_timeout_secs: 120,
        }
    }
}

impl OllamaConfig {
    /// Model used for embeddings.
    pub fn embedding_model(&self) -> &str {
        self.embedding_model.as_deref().unwrap_or(&self.model)
    }

    /// Full URL of an API path such as `/api/chat`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(TandemError::config(format!(
                "Ollama base URL must start with http:// or https://, got '{}'",
                self.base_url
            )));
        }
        if self.model.trim().is_empty() {
            return Err(TandemError::config("Ollama model name must not be empty"));
        }
        if self.request_timeout_secs == 0 {
            return Err(TandemError::config("Ollama request timeout must be positive"));
        }
        Ok(())
    }
}

/// Settings for the whole retrieval and answering stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TandemConfig {
    /// Weight of the BM25 source in hybrid mode.
    pub lexical_weight: f32,
    /// Weight of the vector source in hybrid mode.
    pub vector_weight: f32,
    /// Candidates requested from each source.
    pub source_k: usize,
    /// Results kept after fusion.
    pub final_k: usize,
    /// BM25 parameters.
    pub bm25: Bm25Params,
    /// Similarity metric of the vector index.
    pub metric: DistanceMetric,
    /// Fusion settings.
    pub fusion: FusionConfig,
    /// Ollama settings for embeddings and generation.
    pub ollama: OllamaConfig,
}

impl Default for TandemConfig {
    fn default() -> Self {
        TandemConfig {
            lexical_weight: 0.5,
            vector_weight: 0.5,
            source_k: 3,
            final_k: 3,
            bm25: Bm25Params::default(),
            metric: DistanceMetric::default(),
            fusion: FusionConfig::default(),
            ollama: OllamaConfig::default(),
        }
    }
}

impl TandemConfig {
    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config: TandemConfig = serde_json::from_str(&content).map_err(|e| {
            TandemError::config(format!(
                "Invalid config file '{}': {e}",
                path.display()
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        for (name, weight) in [
            ("lexical_weight", self.lexical_weight),
            ("vector_weight", self.vector_weight),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(TandemError::config(format!(
                    "{name} must be a non-negative finite number, got {weight}"
                )));
            }
        }
        if self.source_k == 0 {
            return Err(TandemError::config("source_k must be at least 1"));
        }
        if self.final_k == 0 {
            return Err(TandemError::config("final_k must be at least 1"));
        }
        self.bm25.validate()?;
        self.fusion.validate()?;
        self.ollama.validate()?;
        Ok(())
    }
}
