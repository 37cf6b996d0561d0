//! The standard normalizer shared by indexing and querying.
//!
//! Splits on whitespace, lowercases, and strips ASCII punctuation.
//!
//! # Examples
//!
//! ```
//! use tandem::analysis::analyzer::Analyzer;
//! use tandem::analysis::analyzer::standard::StandardNormalizer;
//!
//! let normalizer = StandardNormalizer::new().unwrap();
//! assert_eq!(
//!     normalizer.terms("The cat sat on the MAT!").unwrap(),
//!     vec!["the", "cat", "sat", "on", "the", "mat"]
//! );
//! ```

use std::sync::Arc;

use crate::analysis::analyzer::Analyzer;
use crate::analysis::analyzer::pipeline::PipelineAnalyzer;
use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::lowercase::LowercaseFilter;
use crate::analysis::token_filter::punctuation::PunctuationStripFilter;
use crate::analysis::tokenizer::whitespace::WhitespaceTokenizer;
use crate::error::Result;

/// Whitespace tokenizer followed by lowercase and punctuation strip filters.
#[derive(Clone, Debug)]
pub struct StandardNormalizer {
    inner: PipelineAnalyzer,
}

impl StandardNormalizer {
    /// Create a new standard normalizer.
    pub fn new() -> Result<Self> {
        let inner = PipelineAnalyzer::new(Arc::new(WhitespaceTokenizer::new()))
            .add_filter(Arc::new(LowercaseFilter::new()))
            .add_filter(Arc::new(PunctuationStripFilter::new()?))
            .with_name("standard");

        Ok(StandardNormalizer { inner })
    }
}

impl Analyzer for StandardNormalizer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        self.inner.analyze(text)
    }

    fn name(&self) -> &'static str {
        "standard"
    }
}

/// Normalize text with a fresh [`StandardNormalizer`].
///
/// Convenient for one-off calls; long-lived components should hold a single
/// shared analyzer instead.
pub fn normalize(text: &str) -> Result<Vec<String>> {
    StandardNormalizer::new()?.terms(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_lowercases_and_strips() {
        let terms = normalize("Dogs chase CATS!!").unwrap();
        assert_eq!(terms, vec!["dogs", "chase", "cats"]);
    }

    #[test]
    fn test_empty_input_yields_empty_stream() {
        assert!(normalize("").unwrap().is_empty());
        assert!(normalize("   ").unwrap().is_empty());
        assert!(normalize("?! ... ,").unwrap().is_empty());
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let normalizer = StandardNormalizer::new().unwrap();
        let text = "Rust's borrow-checker: strict, but FAIR.";
        let first = normalizer.terms(text).unwrap();
        let second = normalizer.terms(text).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, vec!["rusts", "borrowchecker", "strict", "but", "fair"]);
    }

    #[test]
    fn test_titlecase_query_matches_lowercase_text() {
        assert_eq!(normalize("\u{01C5}").unwrap(), vec!["\u{01C6}"]);
        assert_eq!(normalize("\u{01C5}").unwrap(), normalize("\u{01C6}").unwrap());
    }

    #[test]
    fn test_analyzer_name() {
        assert_eq!(StandardNormalizer::new().unwrap().name(), "standard");
    }
}
