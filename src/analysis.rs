//! Text analysis: turning raw text into comparable tokens.
//!
//! The pipeline runs in three stages:
//!
//! ```text
//! raw text → Tokenizer → Filter → Filter → ... → tokens
//! ```
//!
//! The [`analyzer::standard::StandardNormalizer`] is the normalizer used by
//! the lexical index: whitespace tokenization, lowercasing, and ASCII
//! punctuation stripping. Because lexical recall silently degrades when index
//! and query text are normalized differently, the lexical index owns its
//! analyzer and reuses that exact instance for queries.

pub mod analyzer;
pub mod token;
pub mod token_filter;
pub mod tokenizer;
