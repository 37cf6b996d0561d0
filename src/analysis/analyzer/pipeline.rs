//! Pipeline analyzer that combines a tokenizer and filters.
//!
//! Processing order:
//! 1. Tokenizer: splits text into tokens
//! 2. Token filters, applied sequentially in the order they were added
//! 3. Stopped tokens are dropped
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use tandem::analysis::analyzer::Analyzer;
//! use tandem::analysis::analyzer::pipeline::PipelineAnalyzer;
//! use tandem::analysis::token_filter::lowercase::LowercaseFilter;
//! use tandem::analysis::tokenizer::whitespace::WhitespaceTokenizer;
//!
//! let analyzer = PipelineAnalyzer::new(Arc::new(WhitespaceTokenizer::new()))
//!     .add_filter(Arc::new(LowercaseFilter::new()));
//!
//! assert_eq!(analyzer.terms("Hello WORLD").unwrap(), vec!["hello", "world"]);
//! ```

use std::sync::Arc;

use crate::analysis::analyzer::Analyzer;
use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::analysis::tokenizer::Tokenizer;
use crate::error::Result;

/// Runs one tokenizer, then each filter in insertion order.
#[derive(Clone)]
pub struct PipelineAnalyzer {
    tokenizer: Arc<dyn Tokenizer>,
    filters: Vec<Arc<dyn Filter>>,
    label: String,
}

impl PipelineAnalyzer {
    pub fn new(tokenizer: Arc<dyn Tokenizer>) -> Self {
        let label = format!("pipeline_{}", tokenizer.name());
        PipelineAnalyzer {
            tokenizer,
            filters: Vec::new(),
            label,
        }
    }

    /// Append a filter; it sees the output of every filter added before it.
    pub fn add_filter(mut self, filter: Arc<dyn Filter>) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn with_name<S: Into<String>>(mut self, label: S) -> Self {
        self.label = label.into();
        self
    }

    /// Label used in logs, e.g. `pipeline_whitespace`.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Names of the stages in execution order, tokenizer first.
    pub fn stages(&self) -> Vec<&'static str> {
        std::iter::once(self.tokenizer.name())
            .chain(self.filters.iter().map(|filter| filter.name()))
            .collect()
    }
}

impl std::fmt::Debug for PipelineAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PipelineAnalyzer({}: {})", self.label, self.stages().join(" -> "))
    }
}

impl Analyzer for PipelineAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        let tokens = self
            .filters
            .iter()
            .try_fold(self.tokenizer.tokenize(text)?, |tokens, filter| {
                filter.filter(tokens)
            })?;

        Ok(Box::new(tokens.filter(|token| !token.is_stopped())))
    }

    fn name(&self) -> &'static str {
        "pipeline"
    }
}
