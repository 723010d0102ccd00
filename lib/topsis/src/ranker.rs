//! TOPSIS ranker (vector normalization variant)
//!
//! Ranks alternatives by relative closeness to the ideal-best point and
//! distance from the ideal-worst point over weighted, normalized criteria.

use crate::criterion::{normalized_weights, Criterion, Direction};
use crate::matrix::{Alternative, DecisionMatrix};
use rankwise_core::{numeric, EngineConfig, EntityId, Error, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

/// One alternative's place in a ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedAlternative {
    pub id: EntityId,
    /// Relative closeness in [0, 1], full precision
    pub score: f64,
    /// 1-based, 1 = best
    pub rank: usize,
    /// Raw per-criterion values, in criterion order
    pub values: Vec<f64>,
    /// Distance to the ideal-best point (d+)
    pub distance_to_ideal: f64,
    /// Distance to the ideal-worst point (d-)
    pub distance_to_anti_ideal: f64,
}

#[derive(Debug, Clone)]
pub struct TopsisRanker {
    zero_norm_epsilon: f64,
}

impl Default for TopsisRanker {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl TopsisRanker {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            zero_norm_epsilon: config.zero_norm_epsilon,
        }
    }

    /// Rank `alternatives` against `criteria`.
    ///
    /// Fails with a validation error before any computation if the inputs
    /// are inconsistent; never returns a partial ranking.
    pub fn rank(
        &self,
        criteria: &[Criterion],
        alternatives: &[Alternative],
    ) -> Result<Vec<RankedAlternative>> {
        let matrix = DecisionMatrix::new(criteria, alternatives)?;
        self.rank_matrix(&matrix)
    }

    pub fn rank_matrix(&self, matrix: &DecisionMatrix<'_>) -> Result<Vec<RankedAlternative>> {
        let rows = matrix.rows();
        let columns = matrix.columns();
        debug!(alternatives = rows, criteria = columns, "ranking decision matrix");

        let weights = normalized_weights(matrix.criteria());
        let weighted = self.weighted_matrix(matrix, &weights)?;

        let (ideal, anti_ideal) = ideal_points(matrix.criteria(), &weighted);
        trace!(?ideal, ?anti_ideal, "ideal points");

        let mut ranked = Vec::with_capacity(rows);
        for (row, alternative) in weighted.iter().zip(matrix.alternatives()) {
            let d_plus = numeric::euclidean(row, &ideal);
            let d_minus = numeric::euclidean(row, &anti_ideal);
            let denominator = d_plus + d_minus;

            let score = if denominator == 0.0 {
                1.0
            } else {
                d_minus / denominator
            };

            if !score.is_finite() || !denominator.is_finite() {
                return Err(Error::Computation(format!(
                    "non-finite closeness for alternative '{}' (d+ = {}, d- = {})",
                    alternative.id, d_plus, d_minus
                )));
            }

            ranked.push(RankedAlternative {
                id: alternative.id.clone(),
                score,
                rank: 0,
                values: alternative.values.clone(),
                distance_to_ideal: d_plus,
                distance_to_anti_ideal: d_minus,
            });
        }

        // Stable: equal scores keep input order.
        numeric::sort_by_score_desc(&mut ranked, |r| r.score);
        for (position, entry) in ranked.iter_mut().enumerate() {
            entry.rank = position + 1;
        }

        Ok(ranked)
    }

    /// `W[i][j] = value_ij / norm_j * weight_j`, with a zero column when
    /// `norm_j` is at or below the configured epsilon.
    fn weighted_matrix(&self, matrix: &DecisionMatrix<'_>, weights: &[f64]) -> Result<Vec<Vec<f64>>> {
        let rows = matrix.rows();
        let mut weighted = vec![vec![0.0; matrix.columns()]; rows];

        for (j, weight) in weights.iter().enumerate() {
            let norm = (0..rows)
                .map(|i| matrix.value(i, j) * matrix.value(i, j))
                .sum::<f64>()
                .sqrt();

            if !norm.is_finite() {
                return Err(Error::Computation(format!(
                    "norm of criterion '{}' is not finite",
                    matrix.criteria()[j].name
                )));
            }

            if norm <= self.zero_norm_epsilon {
                warn!(
                    criterion = %matrix.criteria()[j].name,
                    "criterion column has zero norm; its contribution is zero"
                );
                continue;
            }

            for (i, row) in weighted.iter_mut().enumerate() {
                row[j] = matrix.value(i, j) / norm * weight;
            }
        }

        Ok(weighted)
    }
}

/// Column-wise ideal-best and ideal-worst points of the weighted matrix
fn ideal_points(criteria: &[Criterion], weighted: &[Vec<f64>]) -> (Vec<f64>, Vec<f64>) {
    let mut ideal = Vec::with_capacity(criteria.len());
    let mut anti_ideal = Vec::with_capacity(criteria.len());

    for (j, criterion) in criteria.iter().enumerate() {
        let (min, max) = weighted
            .iter()
            .map(|row| row[j])
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));

        match criterion.direction {
            Direction::Benefit => {
                ideal.push(max);
                anti_ideal.push(min);
            }
            Direction::Cost => {
                ideal.push(min);
                anti_ideal.push(max);
            }
        }
    }

    (ideal, anti_ideal)
}
