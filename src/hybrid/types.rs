//! Result types produced by the ensemble engine.

use serde::{Deserialize, Serialize};

use crate::document::document::DocumentId;
use crate::error::SourceFailure;

/// One source's share of a fused score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceContribution {
    /// Name of the contributing retriever.
    pub source: String,
    /// Raw score reported by the retriever.
    pub raw_score: f32,
    /// Score after per-list normalization.
    pub normalized_score: f32,
    /// Weight of the retriever.
    pub weight: f32,
}

impl SourceContribution {
    /// Weighted normalized score added to the fused total.
    pub fn weighted_score(&self) -> f32 {
        self.weight * self.normalized_score
    }
}

/// A deduplicated document with its fused score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusedResult {
    /// Document identifier.
    pub doc_id: DocumentId,
    /// Sum of weighted normalized scores over contributing sources.
    pub score: f32,
    /// Per-source breakdown, in source registration order.
    pub contributions: Vec<SourceContribution>,
}

impl FusedResult {
    /// Contribution of the named source, if it returned this document.
    pub fn contribution(&self, source: &str) -> Option<&SourceContribution> {
        self.contributions.iter().find(|c| c.source == source)
    }
}

/// Outcome of querying one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SourceStatus {
    /// The source answered with this many candidates.
    Succeeded { candidates: usize },
    /// The source returned an error.
    Failed { reason: String },
    /// The source did not answer within the per-source timeout.
    TimedOut,
}

impl SourceStatus {
    /// Whether the source answered.
    pub fn is_success(&self) -> bool {
        matches!(self, SourceStatus::Succeeded { .. })
    }
}

/// Status of one registered source for one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceReport {
    /// Name of the retriever.
    pub source: String,
    /// Weight of the retriever.
    pub weight: f32,
    /// What happened.
    #[serde(flatten)]
    pub status: SourceStatus,
}

impl SourceReport {
    /// Failure record for a source that did not succeed.
    pub fn failure(&self) -> Option<SourceFailure> {
        let reason = match &self.status {
            SourceStatus::Succeeded { .. } => return None,
            SourceStatus::Failed { reason } => reason.clone(),
            SourceStatus::TimedOut => "timed out".to_string(),
        };
        Some(SourceFailure {
            retriever: self.source.clone(),
            reason,
        })
    }
}

/// Fused results of one query plus the per-source report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusedResults {
    /// The query text.
    pub query: String,
    /// Fused documents, best first.
    pub results: Vec<FusedResult>,
    /// One report per registered source, in registration order.
    pub sources: Vec<SourceReport>,
    /// Wall-clock time of the whole search, in milliseconds.
    pub elapsed_ms: u64,
}

impl FusedResults {
    /// Envelope with no results.
    pub fn empty<S: Into<String>>(query: S) -> Self {
        FusedResults {
            query: query.into(),
            results: Vec::new(),
            sources: Vec::new(),
            elapsed_ms: 0,
        }
    }

    /// Number of fused results.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Whether no document survived fusion.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Identifiers of the fused results, best first.
    pub fn doc_ids(&self) -> Vec<&DocumentId> {
        self.results.iter().map(|r| &r.doc_id).collect()
    }

    /// Whether at least one source failed or timed out.
    pub fn is_degraded(&self) -> bool {
        self.sources.iter().any(|s| !s.status.is_success())
    }

    /// Failures of the sources that did not answer.
    pub fn failures(&self) -> Vec<SourceFailure> {
        self.sources.iter().filter_map(SourceReport::failure).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(source: &str, status: SourceStatus) -> SourceReport {
        SourceReport {
            source: source.to_string(),
            weight: 0.5,
            status,
        }
    }

    #[test]
    fn test_source_report_failure() {
        assert!(report("bm25", SourceStatus::Succeeded { candidates: 3 })
            .failure()
            .is_none());

        let failure = report("vector", SourceStatus::TimedOut).failure().unwrap();
        assert_eq!(failure.to_string(), "vector: timed out");

        let failure = report(
            "vector",
            SourceStatus::Failed {
                reason: "connection refused".to_string(),
            },
        )
        .failure()
        .unwrap();
        assert_eq!(failure.reason, "connection refused");
    }

    #[test]
    fn test_fused_results_helpers() {
        let mut results = FusedResults::empty("cat");
        assert!(results.is_empty());
        assert!(!results.is_degraded());

        results.results.push(FusedResult {
            doc_id: "0".into(),
            score: 0.5,
            contributions: vec![SourceContribution {
                source: "bm25".to_string(),
                raw_score: 1.2,
                normalized_score: 1.0,
                weight: 0.5,
            }],
        });
        results.sources = vec![
            report("bm25", SourceStatus::Succeeded { candidates: 1 }),
            report("vector", SourceStatus::TimedOut),
        ];

        assert_eq!(results.len(), 1);
        assert_eq!(results.doc_ids()[0].as_str(), "0");
        assert!(results.is_degraded());
        assert_eq!(results.failures().len(), 1);
        assert_eq!(
            results.results[0].contribution("bm25").unwrap().weighted_score(),
            0.5
        );
        assert!(results.results[0].contribution("vector").is_none());
    }

    #[test]
    fn test_source_report_serializes_flat() {
        let json = serde_json::to_value(report("bm25", SourceStatus::Succeeded { candidates: 2 }))
            .unwrap();
        assert_eq!(json["source"], "bm25");
        assert_eq!(json["status"], "succeeded");
        assert_eq!(json["candidates"], 2);
    }
}
