//! BM25 parameters and per-term scoring.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TandemError};

/// Tuning parameters for BM25.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bm25Params {
    /// K1 parameter (term frequency saturation).
    pub k1: f32,

    /// B parameter (document length normalization).
    pub b: f32,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Bm25Params { k1: 1.5, b: 0.75 }
    }
}

impl Bm25Params {
    /// Create parameters with explicit values.
    pub fn new(k1: f32, b: f32) -> Self {
        Bm25Params { k1, b }
    }

    /// Check that `k1` is finite and non-negative and `b` lies in `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        if !self.k1.is_finite() || self.k1 < 0.0 {
            return Err(TandemError::config(format!(
                "BM25 k1 must be a non-negative finite number, got {}",
                self.k1
            )));
        }
        if !(0.0..=1.0).contains(&self.b) {
            return Err(TandemError::config(format!(
                "BM25 b must be between 0.0 and 1.0, got {}",
                self.b
            )));
        }
        Ok(())
    }

    /// Smoothed inverse document frequency. Always positive.
    ///
    /// `ln(1 + (N - df + 0.5) / (df + 0.5))`
    pub fn idf(&self, total_docs: usize, doc_freq: usize) -> f32 {
        let n = total_docs as f32;
        let df = doc_freq as f32;
        (1.0 + (n - df + 0.5) / (df + 0.5)).ln()
    }

    /// Saturated, length-normalized term frequency component.
    pub fn tf_component(&self, term_freq: u32, doc_len: u32, avg_doc_len: f32) -> f32 {
        let tf = term_freq as f32;
        let norm = 1.0 - self.b + self.b * (doc_len as f32 / avg_doc_len);
        (tf * (self.k1 + 1.0)) / (tf + self.k1 * norm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params() {
        let params = Bm25Params::default();
        assert_eq!(params.k1, 1.5);
        assert_eq!(params.b, 0.75);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(Bm25Params::new(-0.1, 0.75).validate().is_err());
        assert!(Bm25Params::new(f32::NAN, 0.75).validate().is_err());
        assert!(Bm25Params::new(1.2, 1.5).validate().is_err());
        assert!(Bm25Params::new(1.2, -0.1).validate().is_err());
    }

    #[test]
    fn test_idf_is_positive_and_decreasing() {
        let params = Bm25Params::default();
        let rare = params.idf(3, 1);
        let common = params.idf(3, 3);

        assert!(common > 0.0);
        assert!(rare > common);
        assert!((rare - (1.0f32 + 2.5 / 1.5).ln()).abs() < 1e-6);
    }

    #[test]
    fn test_tf_component_saturates() {
        let params = Bm25Params::default();
        let one = params.tf_component(1, 4, 4.0);
        let many = params.tf_component(100, 4, 4.0);

        assert!((one - 1.0).abs() < 1e-6);
        assert!(many > one);
        assert!(many < params.k1 + 1.0);
    }

    #[test]
    fn test_tf_component_penalizes_long_documents() {
        let params = Bm25Params::default();
        assert!(params.tf_component(1, 2, 4.0) > params.tf_component(1, 8, 4.0));
    }
}
