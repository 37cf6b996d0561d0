//! Analyzers combine a tokenizer with a chain of filters.
//!
//! - [`pipeline::PipelineAnalyzer`] - Generic tokenizer + filters pipeline
//! - [`standard::StandardNormalizer`] - Whitespace split, lowercase, punctuation strip

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for analyzers that convert text into processed tokens.
pub trait Analyzer: Send + Sync {
    /// Analyze the given text and return a stream of tokens.
    ///
    /// Stopped tokens are removed from the returned stream.
    fn analyze(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this analyzer (for debugging and configuration).
    fn name(&self) -> &'static str;

    /// Analyze text and collect the resulting term texts.
    fn terms(&self, text: &str) -> Result<Vec<String>> {
        Ok(self.analyze(text)?.map(|token| token.text).collect())
    }
}

pub mod pipeline;
pub mod standard;
