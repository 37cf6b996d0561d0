//! Ensemble retriever: concurrent fan-out, normalization and weighted fusion.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use log::{debug, error, warn};

use crate::document::corpus::Corpus;
use crate::error::{Result, TandemError};
use crate::hybrid::config::FusionConfig;
use crate::hybrid::merger::{ResultMerger, SourceList};
use crate::hybrid::types::{FusedResults, SourceReport, SourceStatus};
use crate::retrieval::{RankedCandidate, Retriever};

/// A retriever registered with the ensemble, with its weight.
#[derive(Clone)]
pub struct RetrieverSource {
    /// The ranking source.
    pub retriever: Arc<dyn Retriever>,
    /// Relative weight; non-negative and finite.
    pub weight: f32,
    /// Candidates requested from this source. Defaults to the query's `k`.
    pub k: Option<usize>,
}

impl RetrieverSource {
    /// Register `retriever` with `weight`.
    pub fn new(retriever: Arc<dyn Retriever>, weight: f32) -> Self {
        RetrieverSource {
            retriever,
            weight,
            k: None,
        }
    }

    /// Request a fixed number of candidates from this source.
    pub fn with_k(mut self, k: usize) -> Self {
        self.k = Some(k);
        self
    }

    /// Name of the underlying retriever.
    pub fn name(&self) -> &str {
        self.retriever.name()
    }
}

impl fmt::Debug for RetrieverSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetrieverSource")
            .field("retriever", &self.retriever.name())
            .field("weight", &self.weight)
            .field("k", &self.k)
            .finish()
    }
}

/// What one source produced for one query.
enum SourceOutcome {
    Answered(Vec<RankedCandidate>),
    Failed(TandemError),
    TimedOut,
}

/// Fuses the ranked lists of several retrievers into one ranking.
///
/// Sources and weights are fixed at construction. Each query fans out to all
/// sources concurrently; a source that errors or times out is reported in
/// the result envelope and left out of the fusion. Only when every source
/// fails does [`search`](Self::search) return an error.
pub struct EnsembleRetriever {
    sources: Vec<RetrieverSource>,
    corpus: Arc<Corpus>,
    config: FusionConfig,
    merger: ResultMerger,
}

impl EnsembleRetriever {
    /// Create an ensemble over `sources`.
    ///
    /// Fails if no source is given, any weight is negative or non-finite, or
    /// the fusion configuration is invalid.
    pub fn new(
        sources: Vec<RetrieverSource>,
        corpus: Arc<Corpus>,
        config: FusionConfig,
    ) -> Result<Self> {
        if sources.is_empty() {
            return Err(TandemError::config(
                "Ensemble requires at least one retriever source",
            ));
        }
        for source in &sources {
            if !source.weight.is_finite() || source.weight < 0.0 {
                return Err(TandemError::config(format!(
                    "Weight of source '{}' must be a non-negative finite number, got {}",
                    source.name(),
                    source.weight
                )));
            }
        }
        config.validate()?;

        let merger = ResultMerger::new(config.normalization);
        Ok(EnsembleRetriever {
            sources,
            corpus,
            config,
            merger,
        })
    }

    /// Query every source and fuse their lists into at most `k` results.
    pub async fn search(&self, query: &str, k: usize) -> Result<FusedResults> {
        let start = Instant::now();

        let outcomes = join_all(
            self.sources
                .iter()
                .map(|source| self.query_source(source, query, k)),
        )
        .await;

        let mut lists = Vec::with_capacity(outcomes.len());
        let mut reports = Vec::with_capacity(outcomes.len());

        for (position, (source, outcome)) in self.sources.iter().zip(outcomes).enumerate() {
            let status = match outcome {
                SourceOutcome::Answered(mut candidates) => {
                    candidates.truncate(source.k.unwrap_or(k));
                    let status = SourceStatus::Succeeded {
                        candidates: candidates.len(),
                    };
                    lists.push(SourceList {
                        position,
                        source: source.name().to_string(),
                        weight: source.weight,
                        candidates,
                    });
                    status
                }
                SourceOutcome::Failed(err) => {
                    warn!("Source '{}' failed: {}", source.name(), err);
                    SourceStatus::Failed {
                        reason: err.to_string(),
                    }
                }
                SourceOutcome::TimedOut => {
                    warn!(
                        "Source '{}' timed out after {:?}",
                        source.name(),
                        self.config.per_source_timeout()
                    );
                    SourceStatus::TimedOut
                }
            };
            reports.push(SourceReport {
                source: source.name().to_string(),
                weight: source.weight,
                status,
            });
        }

        if lists.is_empty() {
            let failures = reports.iter().filter_map(SourceReport::failure).collect();
            let err = TandemError::AllSourcesFailed { failures };
            error!("Query {query:?} failed: {err}");
            return Err(err);
        }

        let results = self.merger.fuse(&lists, &self.corpus, k);
        let elapsed_ms = start.elapsed().as_millis() as u64;

        debug!(
            "Fused {} results from {}/{} sources for {:?} in {}ms",
            results.len(),
            lists.len(),
            self.sources.len(),
            query,
            elapsed_ms
        );

        Ok(FusedResults {
            query: query.to_string(),
            results,
            sources: reports,
            elapsed_ms,
        })
    }

    async fn query_source(&self, source: &RetrieverSource, query: &str, k: usize) -> SourceOutcome {
        let request = source.retriever.retrieve(query, source.k.unwrap_or(k));
        let result = match self.config.per_source_timeout() {
            Some(limit) => match tokio::time::timeout(limit, request).await {
                Ok(result) => result,
                Err(_) => return SourceOutcome::TimedOut,
            },
            None => request.await,
        };

        match result {
            Ok(candidates) => SourceOutcome::Answered(candidates),
            Err(err) => SourceOutcome::Failed(err),
        }
    }

    /// Registered sources, in registration order.
    pub fn sources(&self) -> &[RetrieverSource] {
        &self.sources
    }

    /// Fusion configuration.
    pub fn config(&self) -> &FusionConfig {
        &self.config
    }

    /// Corpus the sources were built over.
    pub fn corpus(&self) -> &Arc<Corpus> {
        &self.corpus
    }
}

impl fmt::Debug for EnsembleRetriever {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnsembleRetriever")
            .field("sources", &self.sources)
            .field("config", &self.config)
            .field("corpus_len", &self.corpus.len())
            .finish()
    }
}
