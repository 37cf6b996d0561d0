//! Ensemble fusion of independently ranked lists.
//!
//! The [`engine::EnsembleRetriever`] queries every registered
//! [`Retriever`](crate::retrieval::Retriever) concurrently, rescales each
//! list on its own ([`scorer::ScoreNormalizer`]), and combines the lists with
//! per-source weights ([`merger::ResultMerger`]). Raw scores from different
//! sources are never compared directly.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use tandem::analysis::analyzer::standard::StandardNormalizer;
//! use tandem::document::corpus::Corpus;
//! use tandem::hybrid::config::FusionConfig;
//! use tandem::hybrid::engine::{EnsembleRetriever, RetrieverSource};
//! use tandem::lexical::bm25::Bm25Params;
//! use tandem::lexical::index::LexicalIndex;
//!
//! # async fn example() -> tandem::error::Result<()> {
//! let corpus = Arc::new(Corpus::from_texts(["the cat sat on the mat", "dogs chase cats"]));
//! let bm25 = LexicalIndex::build(
//!     corpus.clone(),
//!     Arc::new(StandardNormalizer::new()?),
//!     Bm25Params::default(),
//! )?;
//!
//! let engine = EnsembleRetriever::new(
//!     vec![RetrieverSource::new(Arc::new(bm25), 1.0)],
//!     corpus,
//!     FusionConfig::default(),
//! )?;
//! let results = engine.search("cat", 3).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod engine;
pub mod merger;
pub mod scorer;
pub mod types;
