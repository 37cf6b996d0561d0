//! Lowercase filter implementation.

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// Folds token text to Unicode lowercase.
///
/// Stopped tokens pass through untouched, and tokens that lowercasing would
/// not change are not reallocated. Titlecase letters such as `ǅ` fold too.
#[derive(Clone, Debug, Default)]
pub struct LowercaseFilter;

impl LowercaseFilter {
    /// Create a new lowercase filter.
    pub fn new() -> Self {
        LowercaseFilter
    }

    fn fold(mut token: Token) -> Token {
        if !token.is_stopped() && token.text.chars().any(changes_case) {
            token.text = token.text.to_lowercase();
        }
        token
    }
}

fn changes_case(c: char) -> bool {
    c.to_lowercase().ne(std::iter::once(c))
}

impl Filter for LowercaseFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        Ok(Box::new(tokens.map(Self::fold)))
    }

    fn name(&self) -> &'static str {
        "lowercase"
    }
}
