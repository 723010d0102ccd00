//! Engine configuration
//!
//! Built explicitly by the caller and handed to each engine; nothing is
//! read from process-wide state.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};

/// Smallest accepted `top_n`
pub const MIN_TOP_N: usize = 1;

/// Largest accepted `top_n`
pub const MAX_TOP_N: usize = 50;

const MAX_DISPLAY_PRECISION: u32 = 12;

/// Mapping from raw cosine similarity in [-1, 1] to the public [0, 1] score
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RemapPolicy {
    /// `(cos + 1) / 2`
    #[default]
    Shifted,
    /// `max(cos, 0)`; opposite and orthogonal vectors both score 0
    Clamped,
}

impl RemapPolicy {
    #[inline]
    pub fn apply(self, cosine: f64) -> f64 {
        let score = match self {
            RemapPolicy::Shifted => (cosine + 1.0) / 2.0,
            RemapPolicy::Clamped => cosine.max(0.0),
        };
        score.clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Required vector dimension. `None` accepts whatever the subject has.
    pub vector_dim: Option<usize>,
    /// Norms at or below this are treated as zero
    pub zero_norm_epsilon: f64,
    pub remap: RemapPolicy,
    pub default_top_n: usize,
    /// Catalog size from which candidate scoring runs on the rayon pool
    pub parallel_threshold: usize,
    /// Decimals kept when rounding scores for display
    pub display_precision: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            vector_dim: None,
            zero_norm_epsilon: 0.0,
            remap: RemapPolicy::Shifted,
            default_top_n: 10,
            parallel_threshold: 4096,
            display_precision: 4,
        }
    }
}

impl EngineConfig {
    pub fn with_vector_dim(mut self, dim: usize) -> Self {
        self.vector_dim = Some(dim);
        self
    }

    pub fn with_remap(mut self, remap: RemapPolicy) -> Self {
        self.remap = remap;
        self
    }

    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(MIN_TOP_N..=MAX_TOP_N).contains(&self.default_top_n) {
            return Err(ValidationError::InvalidConfig(format!(
                "default_top_n must be in [{}, {}], got {}",
                MIN_TOP_N, MAX_TOP_N, self.default_top_n
            )));
        }
        if !self.zero_norm_epsilon.is_finite() || self.zero_norm_epsilon < 0.0 {
            return Err(ValidationError::InvalidConfig(format!(
                "zero_norm_epsilon must be finite and >= 0, got {}",
                self.zero_norm_epsilon
            )));
        }
        if self.vector_dim == Some(0) {
            return Err(ValidationError::InvalidConfig(
                "vector_dim must be > 0".to_string(),
            ));
        }
        if self.display_precision > MAX_DISPLAY_PRECISION {
            return Err(ValidationError::InvalidConfig(format!(
                "display_precision must be <= {}, got {}",
                MAX_DISPLAY_PRECISION, self.display_precision
            )));
        }
        Ok(())
    }

    /// Parse and validate a JSON config. Missing keys take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ValidationError> {
        let config: EngineConfig = serde_json::from_str(json)
            .map_err(|e| ValidationError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
