//! Criteria of a decision

use rankwise_core::ValidationError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Whether higher or lower raw values are preferable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Higher is better
    Benefit,
    /// Lower is better
    Cost,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Benefit => write!(f, "BENEFIT"),
            Self::Cost => write!(f, "COST"),
        }
    }
}

impl FromStr for Direction {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BENEFIT" => Ok(Self::Benefit),
            "COST" => Ok(Self::Cost),
            _ => Err(ValidationError::InvalidDirection(s.to_string())),
        }
    }
}

impl Serialize for Direction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Direction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// One criterion of a decision matrix.
///
/// `weight` is stored as given; normalization happens per evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    pub name: String,
    pub weight: f64,
    pub direction: Direction,
}

impl Criterion {
    pub fn new(name: impl Into<String>, weight: f64, direction: Direction) -> Self {
        Self {
            name: name.into(),
            weight,
            direction,
        }
    }

    pub fn benefit(name: impl Into<String>, weight: f64) -> Self {
        Self::new(name, weight, Direction::Benefit)
    }

    pub fn cost(name: impl Into<String>, weight: f64) -> Self {
        Self::new(name, weight, Direction::Cost)
    }
}

/// Divide each weight by the sum. Callers validate positivity first.
///
/// Weights are scaled by the largest one before summing, so the total stays
/// finite for any finite input.
pub fn normalized_weights(criteria: &[Criterion]) -> Vec<f64> {
    let max = criteria.iter().map(|c| c.weight).fold(0.0f64, f64::max);
    if max <= 0.0 {
        return vec![0.0; criteria.len()];
    }
    let total: f64 = criteria.iter().map(|c| c.weight / max).sum();
    criteria.iter().map(|c| (c.weight / max) / total).collect()
}
