//! Configuration for ensemble fusion.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TandemError};

/// Reciprocal rank constant commonly used for RRF.
pub const DEFAULT_RRF_K: f32 = 60.0;

/// How each source's raw scores are rescaled before weighting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScoreNormalization {
    /// `(s - min) / (max - min)`; a single candidate or equal scores map to 1.0.
    #[default]
    MinMax,
    /// `1 - rank / len`, ignoring raw scores.
    Rank,
    /// `1 / (k + rank + 1)`, ignoring raw scores.
    ReciprocalRank {
        /// Smoothing constant.
        k: f32,
    },
}

impl ScoreNormalization {
    /// Reciprocal rank normalization with the usual constant.
    pub fn reciprocal_rank() -> Self {
        ScoreNormalization::ReciprocalRank { k: DEFAULT_RRF_K }
    }

    /// Short name for logs and CLI output.
    pub fn name(&self) -> &'static str {
        match self {
            ScoreNormalization::MinMax => "min_max",
            ScoreNormalization::Rank => "rank",
            ScoreNormalization::ReciprocalRank { .. } => "reciprocal_rank",
        }
    }
}

/// Settings for [`EnsembleRetriever`](crate::hybrid::engine::EnsembleRetriever).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FusionConfig {
    /// Normalization applied to every source list.
    pub normalization: ScoreNormalization,
    /// Time limit for a single source, in milliseconds. `None` waits forever.
    pub per_source_timeout_ms: Option<u64>,
}

impl FusionConfig {
    /// Set the normalization strategy.
    pub fn with_normalization(mut self, normalization: ScoreNormalization) -> Self {
        self.normalization = normalization;
        self
    }

    /// Set the per-source timeout.
    pub fn with_per_source_timeout(mut self, timeout: Duration) -> Self {
        self.per_source_timeout_ms = Some(timeout.as_millis() as u64);
        self
    }

    /// Per-source timeout as a [`Duration`].
    pub fn per_source_timeout(&self) -> Option<Duration> {
        self.per_source_timeout_ms.map(Duration::from_millis)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if let ScoreNormalization::ReciprocalRank { k } = self.normalization
            && (!k.is_finite() || k < 0.0)
        {
            return Err(TandemError::config(format!(
                "Reciprocal rank constant must be a non-negative finite number, got {k}"
            )));
        }
        if self.per_source_timeout_ms == Some(0) {
            return Err(TandemError::config("Per-source timeout must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fusion_config_default() {
        let config = FusionConfig::default();
        assert_eq!(config.normalization, ScoreNormalization::MinMax);
        assert_eq!(config.per_source_timeout(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builders() {
        let config = FusionConfig::default()
            .with_normalization(ScoreNormalization::reciprocal_rank())
            .with_per_source_timeout(Duration::from_millis(250));

        assert_eq!(
            config.normalization,
            ScoreNormalization::ReciprocalRank { k: 60.0 }
        );
        assert_eq!(config.per_source_timeout(), Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config =
            FusionConfig::default().with_normalization(ScoreNormalization::ReciprocalRank { k: -1.0 });
        assert!(config.validate().is_err());

        let config = FusionConfig {
            per_source_timeout_ms: Some(0),
            ..FusionConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_normalization_serde() {
        let json = serde_json::to_string(&ScoreNormalization::ReciprocalRank { k: 10.0 }).unwrap();
        assert_eq!(json, r#"{"type":"reciprocal_rank","k":10.0}"#);

        let parsed: ScoreNormalization = serde_json::from_str(r#"{"type":"rank"}"#).unwrap();
        assert_eq!(parsed, ScoreNormalization::Rank);

        let config: FusionConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, FusionConfig::default());
    }

    #[test]
    fn test_name_matches_serde_tag() {
        for normalization in [
            ScoreNormalization::MinMax,
            ScoreNormalization::Rank,
            ScoreNormalization::reciprocal_rank(),
        ] {
            let json = serde_json::to_value(normalization).unwrap();
            assert_eq!(json["type"], normalization.name());
        }
    }
}
