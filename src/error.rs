//! Error types for the Tandem library.
//!
//! All fallible operations return [`Result`], whose error type is the
//! [`TandemError`] enum. Construction-time problems (bad weights, no sources,
//! unreadable corpus) surface as errors and are meant to halt startup.
//! Per-query failures of a single source never surface here: the fusion
//! engine records them in its result envelope. Only when every source fails
//! does a query return [`TandemError::AllSourcesFailed`].
//!
//! # Examples
//!
//! ```
//! use tandem::error::{TandemError, Result};
//!
//! fn check_weight(weight: f32) -> Result<()> {
//!     if weight < 0.0 {
//!         return Err(TandemError::config("weight must be non-negative"));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_weight(-1.0).is_err());
//! ```

use std::fmt;
use std::io;

use thiserror::Error;

/// A single source failure, as recorded by the fusion engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFailure {
    /// Name of the source retriever.
    pub retriever: String,
    /// Human-readable reason (error message or "timed out").
    pub reason: String,
}

impl fmt::Display for SourceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.retriever, self.reason)
    }
}

/// The main error type for Tandem operations.
#[derive(Error, Debug)]
pub enum TandemError {
    /// I/O errors (corpus files, config files).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid configuration: negative weights, no sources, bad parameters.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Corpus construction or loading errors.
    #[error("Corpus error: {0}")]
    Corpus(String),

    /// Analysis-related errors (tokenization, filtering).
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// A single source retriever failed or timed out.
    #[error("Source '{retriever}' unavailable: {reason}")]
    SourceUnavailable { retriever: String, reason: String },

    /// Every registered source failed for a query.
    #[error("No results from any source ({})", join_failures(.failures))]
    AllSourcesFailed { failures: Vec<SourceFailure> },

    /// Embedding provider errors.
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Text generation provider errors.
    #[error("Generation error: {0}")]
    Generation(String),

    /// Vector errors (dimension mismatch, invalid values).
    #[error("Vector error: {0}")]
    Vector(String),

    /// HTTP transport errors from the provider clients.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases.
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error.
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

fn join_failures(failures: &[SourceFailure]) -> String {
    failures
        .iter()
        .map(|failure| failure.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type alias for operations that may fail with TandemError.
pub type Result<T> = std::result::Result<T, TandemError>;

impl TandemError {
    /// Create a new configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        TandemError::Configuration(msg.into())
    }

    /// Create a new corpus error.
    pub fn corpus<S: Into<String>>(msg: S) -> Self {
        TandemError::Corpus(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        TandemError::Analysis(msg.into())
    }

    /// Create a new source-unavailable error.
    pub fn source_unavailable<S: Into<String>, R: Into<String>>(retriever: S, reason: R) -> Self {
        TandemError::SourceUnavailable {
            retriever: retriever.into(),
            reason: reason.into(),
        }
    }

    /// Create a new embedding error.
    pub fn embedding<S: Into<String>>(msg: S) -> Self {
        TandemError::Embedding(msg.into())
    }

    /// Create a new generation error.
    pub fn generation<S: Into<String>>(msg: S) -> Self {
        TandemError::Generation(msg.into())
    }

    /// Create a new vector error.
    pub fn vector<S: Into<String>>(msg: S) -> Self {
        TandemError::Vector(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        TandemError::Other(msg.into())
    }

    /// Whether this error reports that every source failed for a query.
    pub fn is_all_sources_failed(&self) -> bool {
        matches!(self, TandemError::AllSourcesFailed { .. })
    }
}
