//! Per-list score normalization.
//!
//! Every source list is rescaled on its own so that lists with unrelated
//! score ranges can be weighted and summed.

use crate::hybrid::config::ScoreNormalization;
use crate::retrieval::RankedCandidate;

/// Score normalizer for a single ranked list.
#[derive(Debug, Clone, Copy)]
pub struct ScoreNormalizer {
    /// The normalization strategy to use.
    strategy: ScoreNormalization,
}

impl ScoreNormalizer {
    /// Create a new score normalizer.
    ///
    /// # Examples
    ///
    /// ```
    /// use tandem::hybrid::config::ScoreNormalization;
    /// use tandem::hybrid::scorer::ScoreNormalizer;
    ///
    /// let normalizer = ScoreNormalizer::new(ScoreNormalization::MinMax);
    /// assert_eq!(normalizer.normalize_scores(&[4.0, 2.0, 0.0]), vec![1.0, 0.5, 0.0]);
    /// ```
    pub fn new(strategy: ScoreNormalization) -> Self {
        Self { strategy }
    }

    /// Normalize a list of candidates, which must be in rank order.
    pub fn normalize(&self, candidates: &[RankedCandidate]) -> Vec<f32> {
        let scores: Vec<f32> = candidates.iter().map(|c| c.score).collect();
        self.normalize_scores(&scores)
    }

    /// Normalize raw scores given in rank order. The output has one entry per
    /// input score.
    pub fn normalize_scores(&self, scores: &[f32]) -> Vec<f32> {
        match self.strategy {
            ScoreNormalization::MinMax => normalize_min_max(scores),
            ScoreNormalization::Rank => {
                let len = scores.len() as f32;
                (0..scores.len()).map(|rank| 1.0 - rank as f32 / len).collect()
            }
            ScoreNormalization::ReciprocalRank { k } => (0..scores.len())
                .map(|rank| 1.0 / (k + rank as f32 + 1.0))
                .collect(),
        }
    }
}

/// Min-max normalization to `[0, 1]`.
///
/// Non-finite scores are ignored when finding the range and normalize to 0.
/// Only an exactly flat list (one candidate, or all scores equal) maps to 1.0;
/// the arithmetic runs in `f64` so tiny or huge ranges keep their order.
fn normalize_min_max(scores: &[f32]) -> Vec<f32> {
    let (min, max) = scores
        .iter()
        .filter(|s| s.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &s| {
            (lo.min(f64::from(s)), hi.max(f64::from(s)))
        });
    let range = max - min;

    scores
        .iter()
        .map(|&score| {
            if !score.is_finite() {
                0.0
            } else if range == 0.0 {
                1.0
            } else {
                ((f64::from(score) - min) / range) as f32
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_max() {
        let normalizer = ScoreNormalizer::new(ScoreNormalization::MinMax);
        let normalized = normalizer.normalize_scores(&[3.0, 2.0, 1.0]);

        assert_eq!(normalized, vec![1.0, 0.5, 0.0]);
    }

    #[test]
    fn test_min_max_single_and_equal() {
        let normalizer = ScoreNormalizer::new(ScoreNormalization::MinMax);

        assert_eq!(normalizer.normalize_scores(&[0.42]), vec![1.0]);
        assert_eq!(normalizer.normalize_scores(&[0.3, 0.3, 0.3]), vec![1.0, 1.0, 1.0]);
        assert!(normalizer.normalize_scores(&[]).is_empty());
    }

    #[test]
    fn test_min_max_keeps_order_of_tiny_ranges() {
        let normalizer = ScoreNormalizer::new(ScoreNormalization::MinMax);

        assert_eq!(normalizer.normalize_scores(&[2e-8, 1e-8]), vec![1.0, 0.0]);
        assert_eq!(
            normalizer.normalize_scores(&[1.0 + f32::EPSILON, 1.0]),
            vec![1.0, 0.0]
        );
    }

    #[test]
    fn test_min_max_extreme_range() {
        let normalizer = ScoreNormalizer::new(ScoreNormalization::MinMax);
        let normalized = normalizer.normalize_scores(&[f32::MAX, 0.0, -f32::MAX]);

        assert_eq!(normalized, vec![1.0, 0.5, 0.0]);
    }

    #[test]
    fn test_min_max_negative_scores() {
        let normalizer = ScoreNormalizer::new(ScoreNormalization::MinMax);
        let normalized = normalizer.normalize_scores(&[0.5, -0.5]);

        assert_eq!(normalized, vec![1.0, 0.0]);
    }

    #[test]
    fn test_min_max_ignores_non_finite() {
        let normalizer = ScoreNormalizer::new(ScoreNormalization::MinMax);
        let normalized = normalizer.normalize_scores(&[2.0, f32::NAN, 1.0]);

        assert_eq!(normalized, vec![1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_rank() {
        let normalizer = ScoreNormalizer::new(ScoreNormalization::Rank);
        let normalized = normalizer.normalize_scores(&[9.0, 9.0, 1.0, 0.5]);

        assert_eq!(normalized, vec![1.0, 0.75, 0.5, 0.25]);
    }

    #[test]
    fn test_reciprocal_rank() {
        let normalizer = ScoreNormalizer::new(ScoreNormalization::reciprocal_rank());
        let normalized = normalizer.normalize_scores(&[5.0, 4.0]);

        assert!((normalized[0] - 1.0 / 61.0).abs() < 1e-7);
        assert!((normalized[1] - 1.0 / 62.0).abs() < 1e-7);
    }

    #[test]
    fn test_normalize_candidates() {
        let normalizer = ScoreNormalizer::new(ScoreNormalization::MinMax);
        let candidates = vec![
            RankedCandidate::new("a", 10.0, "bm25"),
            RankedCandidate::new("b", 6.0, "bm25"),
        ];

        assert_eq!(normalizer.normalize(&candidates), vec![1.0, 0.0]);
    }
}
