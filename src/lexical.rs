//! Lexical ranking with BM25 term statistics.
//!
//! - [`bm25::Bm25Params`] - the `k1`/`b` tuning knobs and the per-term formula
//! - [`index::LexicalIndex`] - term statistics built once over a corpus,
//!   queried for the top-k documents
//! - [`stats::LexicalIndexStats`] - summary figures of a built index

pub mod bm25;
pub mod index;
pub mod stats;
