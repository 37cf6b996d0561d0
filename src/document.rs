//! Documents and the corpus they live in.
//!
//! - [`document::Document`] - an identifier plus raw text, immutable once built
//! - [`corpus::Corpus`] - the ordered, identifier-addressable document set
//! - [`loader`] - reading a corpus from JSON or JSON Lines files

pub mod corpus;
pub mod document;
pub mod loader;
