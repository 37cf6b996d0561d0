//! Similarity metrics between embedding vectors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TandemError};

/// Metric used to compare a query vector against stored vectors.
///
/// Every metric is expressed as a similarity where higher is better:
///
/// - `Cosine`: cosine of the angle, in `[-1, 1]`; 0 if either vector is zero
/// - `DotProduct`: raw inner product, unbounded
/// - `Euclidean`: `1 / (1 + distance)`, in `(0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    /// Cosine similarity
    #[default]
    Cosine,
    /// Dot product similarity
    DotProduct,
    /// Inverse Euclidean (L2) distance
    Euclidean,
}

impl DistanceMetric {
    /// Calculate the similarity between two vectors using this metric.
    pub fn similarity(&self, a: &[f32], b: &[f32]) -> Result<f32> {
        if a.len() != b.len() {
            return Err(TandemError::vector(format!(
                "Vector dimensions must match for similarity calculation: {} vs {}",
                a.len(),
                b.len()
            )));
        }

        let similarity = match self {
            DistanceMetric::Cosine => {
                let dot_product = dot(a, b);
                let norm_a = dot(a, a).sqrt();
                let norm_b = dot(b, b).sqrt();

                if norm_a == 0.0 || norm_b == 0.0 {
                    0.0
                } else {
                    dot_product / (norm_a * norm_b)
                }
            }
            DistanceMetric::DotProduct => dot(a, b),
            DistanceMetric::Euclidean => {
                let distance = a
                    .iter()
                    .zip(b.iter())
                    .map(|(x, y)| (x - y).powi(2))
                    .sum::<f32>()
                    .sqrt();
                1.0 / (1.0 + distance)
            }
        };

        Ok(similarity)
    }

    /// Get the name of this metric.
    pub fn name(&self) -> &'static str {
        match self {
            DistanceMetric::Cosine => "cosine",
            DistanceMetric::DotProduct => "dot_product",
            DistanceMetric::Euclidean => "euclidean",
        }
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DistanceMetric {
    type Err = TandemError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "cosine" => Ok(DistanceMetric::Cosine),
            "dot_product" | "dot" => Ok(DistanceMetric::DotProduct),
            "euclidean" | "l2" => Ok(DistanceMetric::Euclidean),
            _ => Err(TandemError::config(format!(
                "Unknown distance metric: {s}"
            ))),
        }
    }
}
