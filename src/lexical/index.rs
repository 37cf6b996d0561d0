//! In-memory BM25 index over a fixed corpus.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use ahash::AHashMap;
use async_trait::async_trait;
use log::{debug, info};
use rayon::prelude::*;

use crate::analysis::analyzer::Analyzer;
use crate::document::corpus::Corpus;
use crate::error::Result;
use crate::lexical::bm25::Bm25Params;
use crate::lexical::stats::LexicalIndexStats;
use crate::retrieval::{RankedCandidate, Retriever};

/// A single posting: document ordinal and term frequency.
#[derive(Debug, Clone, Copy)]
struct Posting {
    ordinal: usize,
    term_freq: u32,
}

/// BM25 index built once from a corpus and frozen afterwards.
///
/// The analyzer given at build time is also used for every query, so query
/// terms and document terms are always normalized the same way.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use tandem::analysis::analyzer::standard::StandardNormalizer;
/// use tandem::document::corpus::Corpus;
/// use tandem::lexical::bm25::Bm25Params;
/// use tandem::lexical::index::LexicalIndex;
///
/// let corpus = Arc::new(Corpus::from_texts([
///     "the cat sat on the mat",
///     "dogs chase cats",
///     "the mat is red",
/// ]));
/// let index = LexicalIndex::build(
///     corpus,
///     Arc::new(StandardNormalizer::new().unwrap()),
///     Bm25Params::default(),
/// )
/// .unwrap();
///
/// let results = index.query("cat mat", 3).unwrap();
/// assert_eq!(results[0].doc_id.as_str(), "0");
/// ```
pub struct LexicalIndex {
    corpus: Arc<Corpus>,
    analyzer: Arc<dyn Analyzer>,
    params: Bm25Params,
    name: String,
    postings: AHashMap<String, Vec<Posting>>,
    doc_lengths: Vec<u32>,
    total_terms: u64,
    avg_doc_length: f32,
}

impl LexicalIndex {
    /// Analyze every document and accumulate term statistics.
    pub fn build(
        corpus: Arc<Corpus>,
        analyzer: Arc<dyn Analyzer>,
        params: Bm25Params,
    ) -> Result<Self> {
        params.validate()?;

        let analyzed: Vec<Vec<String>> = corpus
            .documents()
            .par_iter()
            .map(|doc| analyzer.terms(doc.text()))
            .collect::<Result<Vec<_>>>()?;

        let mut postings: AHashMap<String, Vec<Posting>> = AHashMap::new();
        let mut doc_lengths = Vec::with_capacity(analyzed.len());
        let mut total_terms = 0u64;

        for (ordinal, terms) in analyzed.into_iter().enumerate() {
            doc_lengths.push(terms.len() as u32);
            total_terms += terms.len() as u64;

            let mut term_freqs: AHashMap<String, u32> = AHashMap::new();
            for term in terms {
                *term_freqs.entry(term).or_insert(0) += 1;
            }
            for (term, term_freq) in term_freqs {
                postings
                    .entry(term)
                    .or_default()
                    .push(Posting { ordinal, term_freq });
            }
        }

        let avg_doc_length = if doc_lengths.is_empty() {
            0.0
        } else {
            total_terms as f32 / doc_lengths.len() as f32
        };

        info!(
            "Built lexical index: {} documents, {} terms, avgdl {:.2}",
            doc_lengths.len(),
            postings.len(),
            avg_doc_length
        );

        Ok(LexicalIndex {
            corpus,
            analyzer,
            params,
            name: "bm25".to_string(),
            postings,
            doc_lengths,
            total_terms,
            avg_doc_length,
        })
    }

    /// Override the name reported by [`Retriever::name`].
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    /// Return at most `k` documents sharing at least one term with `text`,
    /// best first, ties broken by corpus order.
    pub fn query(&self, text: &str, k: usize) -> Result<Vec<RankedCandidate>> {
        if k == 0 || self.doc_lengths.is_empty() || self.avg_doc_length == 0.0 {
            return Ok(Vec::new());
        }

        let query_terms = self.analyzer.terms(text)?;
        let total_docs = self.doc_lengths.len();
        let mut scores: AHashMap<usize, f32> = AHashMap::new();

        // Repeated query terms contribute once per occurrence.
        for term in &query_terms {
            let Some(postings) = self.postings.get(term) else {
                continue;
            };
            let idf = self.params.idf(total_docs, postings.len());
            for posting in postings {
                let tf_component = self.params.tf_component(
                    posting.term_freq,
                    self.doc_lengths[posting.ordinal],
                    self.avg_doc_length,
                );
                *scores.entry(posting.ordinal).or_insert(0.0) += idf * tf_component;
            }
        }

        let mut ranked: Vec<(usize, f32)> = scores.into_iter().collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        ranked.truncate(k);

        debug!(
            "Lexical query {:?} ({} terms) matched {} documents",
            text,
            query_terms.len(),
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

    /// Number of documents containing `term`. The term is matched as given,
    /// without analysis.
    pub fn doc_freq(&self, term: &str) -> usize {
        self.postings.get(term).map_or(0, |p| p.len())
    }

    /// Summary statistics of this index.
    pub fn stats(&self) -> LexicalIndexStats {
        LexicalIndexStats {
            doc_count: self.doc_lengths.len(),
            vocabulary_size: self.postings.len(),
            total_terms: self.total_terms,
            avg_doc_length: self.avg_doc_length,
        }
    }

    /// Number of indexed documents.
    pub fn len(&self) -> usize {
        self.doc_lengths.len()
    }

    /// Whether the index holds no documents.
    pub fn is_empty(&self) -> bool {
        self.doc_lengths.is_empty()
    }

    /// BM25 parameters in use.
    pub fn params(&self) -> &Bm25Params {
        &self.params
    }
}

impl fmt::Debug for LexicalIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LexicalIndex")
            .field("name", &self.name)
            .field("analyzer", &self.analyzer.name())
            .field("params", &self.params)
            .field("stats", &self.stats())
            .finish()
    }
}

#[async_trait]
impl Retriever for LexicalIndex {
    fn name(&self) -> &str {
        &self.name
    }

    async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<RankedCandidate>> {
        self.query(query, k)
    }
}
