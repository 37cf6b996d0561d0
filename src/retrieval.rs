//! The retriever contract shared by every ranking source.
//!
//! A [`Retriever`] answers a query string with its own top-k list of
//! [`RankedCandidate`]s. Scores are only meaningful within a single list:
//! BM25 scores and cosine similarities live on different scales, and the
//! fusion engine normalizes each list before combining them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::document::document::DocumentId;
use crate::error::Result;

/// One entry of a source's ranked list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    /// Identifier of the matching document.
    pub doc_id: DocumentId,
    /// Raw, source-specific score. Higher is better.
    pub score: f32,
    /// Name of the retriever that produced this candidate.
    pub source: String,
}

impl RankedCandidate {
    /// Create a new candidate.
    pub fn new<I: Into<DocumentId>, S: Into<String>>(doc_id: I, score: f32, source: S) -> Self {
        RankedCandidate {
            doc_id: doc_id.into(),
            score,
            source: source.into(),
        }
    }
}

/// A ranking source that can be registered with the ensemble engine.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Name used in logs, candidate tags and source reports.
    fn name(&self) -> &str;

    /// Return at most `k` candidates, best first.
    async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<RankedCandidate>>;
}
