//! Punctuation strip filter implementation.
//!
//! Removes every ASCII punctuation character
//! (``!"#$%&'()*+,-./:;<=>?@[\]^_`{|}~``) from token text. Characters are
//! deleted rather than replaced, so `"don't"` becomes `"dont"` and
//! `"state-of-the-art"` stays a single token. Tokens left empty are stopped.

use regex::Regex;

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::error::{Result, TandemError};

/// ASCII punctuation class, identical to the POSIX `punct` class.
const ASCII_PUNCTUATION_PATTERN: &str = r"[[:punct:]]";

/// A filter that strips ASCII punctuation from tokens.
#[derive(Clone, Debug)]
pub struct PunctuationStripFilter {
    pattern: Regex,
}

impl PunctuationStripFilter {
    /// Create a new punctuation strip filter.
    pub fn new() -> Result<Self> {
        let pattern = Regex::new(ASCII_PUNCTUATION_PATTERN)
            .map_err(|e| TandemError::analysis(format!("Invalid punctuation pattern: {e}")))?;
        Ok(PunctuationStripFilter { pattern })
    }
}

impl Filter for PunctuationStripFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let filtered_tokens = tokens
            .map(|token| {
                if token.is_stopped() {
                    return token;
                }
                let stripped = self.pattern.replace_all(&token.text, "");
                if stripped.is_empty() {
                    token.stop()
                } else {
                    token.with_text(stripped.into_owned())
                }
            })
            .collect::<Vec<_>>();

        Ok(Box::new(filtered_tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "punctuation_strip"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token::Token;

    fn strip(words: &[&str]) -> Vec<Token> {
        let filter = PunctuationStripFilter::new().unwrap();
        let tokens: Vec<Token> = words
            .iter()
            .enumerate()
            .map(|(i, w)| Token::new(*w, i))
            .collect();
        filter.filter(Box::new(tokens.into_iter())).unwrap().collect()
    }

    #[test]
    fn test_strips_surrounding_and_inner_punctuation() {
        let result = strip(&["mat.", "(cat)", "don't", "state-of-the-art"]);

        assert_eq!(result[0].text, "mat");
        assert_eq!(result[1].text, "cat");
        assert_eq!(result[2].text, "dont");
        assert_eq!(result[3].text, "stateoftheart");
        assert!(result.iter().all(|t| !t.is_stopped()));
    }

    #[test]
    fn test_punctuation_only_token_is_stopped() {
        let result = strip(&["--", "...", "ok"]);

        assert!(result[0].is_stopped());
        assert!(result[1].is_stopped());
        assert_eq!(result[2].text, "ok");
    }

    #[test]
    fn test_non_ascii_punctuation_is_kept() {
        let result = strip(&["«bonjour»", "naïve"]);

        assert_eq!(result[0].text, "«bonjour»");
        assert_eq!(result[1].text, "naïve");
    }

    #[test]
    fn test_filter_name() {
        assert_eq!(
            PunctuationStripFilter::new().unwrap().name(),
            "punctuation_strip"
        );
    }
}
