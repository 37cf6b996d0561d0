//! # Tandem
//!
//! Hybrid document retrieval: a BM25 lexical ranking and an embedding
//! similarity ranking, fused into one list by weighted min-max (or rank based)
//! fusion, with an optional grounded answer from a chat model.
//!
//! ## Features
//!
//! - Text analysis pipeline shared by indexing and querying
//! - In-memory BM25 index built once over an ordered corpus
//! - Brute-force vector index over any [`Embedder`](embedding::embedder::Embedder)
//! - Concurrent ensemble fusion with per-source timeouts and failure reports
//! - Answer synthesis that never calls the model without context
//! - Ollama adapters for embeddings and chat

pub mod analysis;
pub mod cli;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod generation;
pub mod hybrid;
pub mod lexical;
pub mod pipeline;
pub mod retrieval;
pub mod vector;

pub mod prelude {
    pub use crate::analysis::analyzer::Analyzer;
    pub use crate::analysis::analyzer::standard::StandardNormalizer;
    pub use crate::config::{OllamaConfig, TandemConfig};
    pub use crate::document::corpus::Corpus;
    pub use crate::document::document::{Document, DocumentId};
    pub use crate::embedding::embedder::Embedder;
    pub use crate::error::{Result, TandemError};
    pub use crate::generation::generator::Generator;
    pub use crate::generation::synthesizer::{Answer, AnswerKind, AnswerSynthesizer};
    pub use crate::hybrid::config::{FusionConfig, ScoreNormalization};
    pub use crate::hybrid::engine::{EnsembleRetriever, RetrieverSource};
    pub use crate::hybrid::types::{FusedResult, FusedResults, SourceReport, SourceStatus};
    pub use crate::lexical::bm25::Bm25Params;
    pub use crate::lexical::index::LexicalIndex;
    pub use crate::pipeline::HybridPipeline;
    pub use crate::retrieval::{RankedCandidate, Retriever};
    pub use crate::vector::distance::DistanceMetric;
    pub use crate::vector::flat::FlatVectorIndex;
    pub use crate::vector::vector::Vector;
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
