//! Semantic ranking by embedding similarity.
//!
//! Any [`Retriever`](crate::retrieval::Retriever) that answers by vector
//! similarity can act as the semantic source of the ensemble. This module
//! ships a brute-force in-memory implementation, [`flat::FlatVectorIndex`].

pub mod distance;
pub mod flat;
pub mod vector;
