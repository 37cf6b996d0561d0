//! Brute-force in-memory vector index.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};
use rayon::prelude::*;

use crate::document::corpus::Corpus;
use crate::embedding::embedder::Embedder;
use crate::error::{Result, TandemError};
use crate::retrieval::{RankedCandidate, Retriever};
use crate::vector::distance::DistanceMetric;
use crate::vector::vector::Vector;

/// Below this many vectors the similarity scan stays on the calling thread.
const PARALLEL_SCAN_THRESHOLD: usize = 1024;

/// Vector index that embeds every corpus document once and compares the query
/// against all of them.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
///
/// use tandem::config::OllamaConfig;
/// use tandem::document::corpus::Corpus;
/// use tandem::embedding::ollama_text_embedder::OllamaTextEmbedder;
/// use tandem::vector::distance::DistanceMetric;
/// use tandem::vector::flat::FlatVectorIndex;
///
/// # async fn example() -> tandem::error::Result<()> {
/// let corpus = Arc::new(Corpus::from_texts(["dogs chase cats", "the mat is red"]));
/// let embedder = Arc::new(OllamaTextEmbedder::new(&OllamaConfig::default())?);
/// let index = FlatVectorIndex::build(corpus, embedder, DistanceMetric::Cosine).await?;
/// let results = index.query("pets", 1).await?;
/// # Ok(())
/// # }
/// ```
pub struct FlatVectorIndex {
    corpus: Arc<Corpus>,
    embedder: Arc<dyn Embedder>,
    metric: DistanceMetric,
    name: String,
    vectors: Vec<Vector>,
    dimension: usize,
}

impl FlatVectorIndex {
    /// Embed every document of `corpus` and store the vectors in corpus order.
    pub async fn build(
        corpus: Arc<Corpus>,
        embedder: Arc<dyn Embedder>,
        metric: DistanceMetric,
    ) -> Result<Self> {
        let texts: Vec<&str> = corpus.iter().map(|doc| doc.text()).collect();
        let vectors = if texts.is_empty() {
            Vec::new()
        } else {
            embedder.embed_batch(&texts).await?
        };

        if vectors.len() != corpus.len() {
            return Err(TandemError::embedding(format!(
                "Embedder returned {} vectors for {} documents",
                vectors.len(),
                corpus.len()
            )));
        }

        let dimension = vectors.first().map_or(0, |v| v.dimension());
        for (ordinal, vector) in vectors.iter().enumerate() {
            vector.validate_dimension(dimension)?;
            if !vector.is_valid() {
                return Err(TandemError::vector(format!(
                    "Embedding of document {ordinal} contains NaN or infinite values"
                )));
            }
        }

        info!(
            "Built vector index: {} documents, dimension {}, metric {}, embedder {}",
            vectors.len(),
            dimension,
            metric,
            embedder.name()
        );

        Ok(FlatVectorIndex {
            corpus,
            embedder,
            metric,
            name: "vector".to_string(),
            vectors,
            dimension,
        })
    }

    /// Override the name reported by [`Retriever::name`].
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    /// Embed `text` and return the `k` most similar documents, ties broken by
    /// corpus order.
    pub async fn query(&self, text: &str, k: usize) -> Result<Vec<RankedCandidate>> {
        if k == 0 || self.vectors.is_empty() {
            return Ok(Vec::new());
        }

        let query_vector = self.embedder.embed(text).await?;
        self.search(&query_vector, k)
    }

    /// Rank stored vectors against an already embedded query.
    pub fn search(&self, query_vector: &Vector, k: usize) -> Result<Vec<RankedCandidate>> {
        if k == 0 || self.vectors.is_empty() {
            return Ok(Vec::new());
        }
        query_vector.validate_dimension(self.dimension)?;

        let score = |(ordinal, vector): (usize, &Vector)| {
            self.metric
                .similarity(&query_vector.data, &vector.data)
                .map(|similarity| (ordinal, similarity))
        };
        let mut ranked: Vec<(usize, f32)> = if self.vectors.len() < PARALLEL_SCAN_THRESHOLD {
            self.vectors
                .iter()
                .enumerate()
                .map(score)
                .collect::<Result<Vec<_>>>()?
        } else {
            self.vectors
                .par_iter()
                .enumerate()
                .map(score)
                .collect::<Result<Vec<_>>>()?
        };

        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        ranked.truncate(k);

        debug!(
            "Vector search over {} documents returned {}",
            self.vectors.len(),
            ranked.len()
        );

        Ok(ranked
            .into_iter()
            .filter_map(|(ordinal, score)| {
                self.corpus
                    .get_by_ordinal(ordinal)
                    .map(|doc| RankedCandidate::new(doc.id().clone(), score, self.name.as_str()))
            })
            .collect())
    }

    /// Dimension of the stored vectors (0 for an empty index).
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Metric used for ranking.
    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    /// Number of stored vectors.
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// Whether the index holds no vectors.
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

impl fmt::Debug for FlatVectorIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlatVectorIndex")
            .field("name", &self.name)
            .field("embedder", &self.embedder.name())
            .field("metric", &self.metric)
            .field("len", &self.vectors.len())
            .field("dimension", &self.dimension)
            .finish()
    }
}

#[async_trait]
impl Retriever for FlatVectorIndex {
    fn name(&self) -> &str {
        &self.name
    }

    async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<RankedCandidate>> {
        self.query(query, k).await
    }
}
