//! Decision matrix: ordered criteria and ordered alternatives

use crate::criterion::Criterion;
use ahash::AHashSet;
use rankwise_core::{EntityId, ValidationError};
use serde::{Deserialize, Serialize};

/// A candidate with one raw value per criterion, in criterion order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alternative {
    pub id: EntityId,
    pub values: Vec<f64>,
}

impl Alternative {
    pub fn new(id: impl Into<EntityId>, values: Vec<f64>) -> Self {
        Self {
            id: id.into(),
            values,
        }
    }
}

/// A validated, borrowed view over one decision.
///
/// Constructing it checks every precondition of a TOPSIS evaluation, so
/// the ranker itself never sees inconsistent input.
#[derive(Debug, Clone, Copy)]
pub struct DecisionMatrix<'a> {
    criteria: &'a [Criterion],
    alternatives: &'a [Alternative],
}

impl<'a> DecisionMatrix<'a> {
    pub fn new(
        criteria: &'a [Criterion],
        alternatives: &'a [Alternative],
    ) -> Result<Self, ValidationError> {
        validate_criteria(criteria)?;
        if alternatives.is_empty() {
            return Err(ValidationError::EmptyAlternatives);
        }

        for alternative in alternatives {
            if alternative.values.len() != criteria.len() {
                return Err(ValidationError::DimensionMismatch {
                    id: alternative.id.to_string(),
                    expected: criteria.len(),
                    actual: alternative.values.len(),
                });
            }
            if let Some(index) = alternative.values.iter().position(|v| !v.is_finite()) {
                return Err(ValidationError::NonFiniteValue {
                    id: alternative.id.to_string(),
                    index,
                });
            }
        }

        Ok(Self {
            criteria,
            alternatives,
        })
    }

    #[inline]
    pub fn criteria(&self) -> &'a [Criterion] {
        self.criteria
    }

    #[inline]
    pub fn alternatives(&self) -> &'a [Alternative] {
        self.alternatives
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.alternatives.len()
    }

    #[inline]
    pub fn columns(&self) -> usize {
        self.criteria.len()
    }

    /// Raw value of alternative `i` on criterion `j`
    #[inline]
    pub fn value(&self, i: usize, j: usize) -> f64 {
        self.alternatives[i].values[j]
    }
}

/// Checks non-empty, unique names and strictly positive finite weights
pub fn validate_criteria(criteria: &[Criterion]) -> Result<(), ValidationError> {
    if criteria.is_empty() {
        return Err(ValidationError::EmptyCriteria);
    }

    let mut seen = AHashSet::with_capacity(criteria.len());
    for criterion in criteria {
        if !seen.insert(criterion.name.as_str()) {
            return Err(ValidationError::DuplicateCriterion(criterion.name.clone()));
        }
        if !(criterion.weight.is_finite() && criterion.weight > 0.0) {
            return Err(ValidationError::NonPositiveWeight {
                criterion: criterion.name.clone(),
                weight: criterion.weight,
            });
        }
    }
    Ok(())
}
