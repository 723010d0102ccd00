//! Explicit handling of incomplete alternatives
//!
//! Entities with gaps in their data (no rating yet, unknown load) must be
//! completed before ranking. The policy is chosen by the caller and every
//! substituted value is reported back so it can be audited.

use crate::criterion::Criterion;
use crate::matrix::{validate_criteria, Alternative};
use rankwise_core::{EntityId, ValidationError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An alternative whose values may be missing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAlternative {
    pub id: EntityId,
    pub values: Vec<Option<f64>>,
}

impl RawAlternative {
    pub fn new(id: impl Into<EntityId>, values: Vec<Option<f64>>) -> Self {
        Self {
            id: id.into(),
            values,
        }
    }
}

impl From<Alternative> for RawAlternative {
    fn from(alternative: Alternative) -> Self {
        Self {
            id: alternative.id,
            values: alternative.values.into_iter().map(Some).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum MissingValuePolicy {
    /// Any missing value fails the call
    #[default]
    Reject,
    /// Fill gaps from per-criterion defaults, keyed by criterion name
    Substitute { defaults: BTreeMap<String, f64> },
}

impl MissingValuePolicy {
    pub fn substitute<I, S>(defaults: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self::Substitute {
            defaults: defaults.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// One value filled in by [`MissingValuePolicy::Substitute`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Substitution {
    pub alternative: EntityId,
    pub criterion: String,
    pub value: f64,
}

/// Completed alternatives plus the record of what was filled in
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub alternatives: Vec<Alternative>,
    pub substitutions: Vec<Substitution>,
}

impl MissingValuePolicy {
    pub fn resolve(
        &self,
        criteria: &[Criterion],
        raw: &[RawAlternative],
    ) -> Result<Resolved, ValidationError> {
        validate_criteria(criteria)?;
        if let MissingValuePolicy::Substitute { defaults } = self {
            if let Some((name, value)) = defaults.iter().find(|(_, v)| !v.is_finite()) {
                return Err(ValidationError::InvalidConfig(format!(
                    "default for '{}' must be finite, got {}",
                    name, value
                )));
            }
        }

        let mut alternatives = Vec::with_capacity(raw.len());
        let mut substitutions = Vec::new();

        for entry in raw {
            if entry.values.len() != criteria.len() {
                return Err(ValidationError::DimensionMismatch {
                    id: entry.id.to_string(),
                    expected: criteria.len(),
                    actual: entry.values.len(),
                });
            }

            let mut values = Vec::with_capacity(criteria.len());
            for (criterion, value) in criteria.iter().zip(&entry.values) {
                match (value, self) {
                    (Some(v), _) => values.push(*v),
                    (None, MissingValuePolicy::Substitute { defaults }) => {
                        let default = defaults.get(&criterion.name).copied().ok_or_else(|| {
                            ValidationError::MissingValue {
                                id: entry.id.to_string(),
                                criterion: criterion.name.clone(),
                            }
                        })?;
                        substitutions.push(Substitution {
                            alternative: entry.id.clone(),
                            criterion: criterion.name.clone(),
                            value: default,
                        });
                        values.push(default);
                    }
                    (None, MissingValuePolicy::Reject) => {
                        return Err(ValidationError::MissingValue {
                            id: entry.id.to_string(),
                            criterion: criterion.name.clone(),
                        });
                    }
                }
            }
            alternatives.push(Alternative {
                id: entry.id.clone(),
                values,
            });
        }

        Ok(Resolved {
            alternatives,
            substitutions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn criteria() -> Vec<Criterion> {
        vec![Criterion::cost("carga", 0.4), Criterion::benefit("rating", 0.6)]
    }

    fn raw() -> Vec<RawAlternative> {
        vec![
            RawAlternative::new(1u64, vec![Some(10.0), Some(4.5)]),
            RawAlternative::new(2u64, vec![Some(5.0), None]),
        ]
    }

    #[test]
    fn test_reject_policy() {
        let err = MissingValuePolicy::Reject.resolve(&criteria(), &raw()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingValue {
                id: "2".to_string(),
                criterion: "rating".to_string()
            }
        );
    }

    #[test]
    fn test_substitute_reports_every_fill() {
        let policy = MissingValuePolicy::substitute([("rating", 3.0), ("carga", 0.0)]);
        let resolved = policy.resolve(&criteria(), &raw()).unwrap();

        assert_eq!(resolved.alternatives[1].values, vec![5.0, 3.0]);
        assert_eq!(
            resolved.substitutions,
            vec![Substitution {
                alternative: EntityId::Integer(2),
                criterion: "rating".to_string(),
                value: 3.0
            }]
        );
    }

    #[test]
    fn test_substitute_without_default_fails() {
        let policy = MissingValuePolicy::substitute([("carga", 0.0)]);
        assert!(matches!(
            policy.resolve(&criteria(), &raw()),
            Err(ValidationError::MissingValue { .. })
        ));
    }

    #[test]
    fn test_complete_input_needs_no_policy() {
        let complete: Vec<RawAlternative> =
            vec![Alternative::new(1u64, vec![1.0, 2.0]).into()];
        let resolved = MissingValuePolicy::Reject.resolve(&criteria(), &complete).unwrap();
        assert!(resolved.substitutions.is_empty());
    }

    #[test]
    fn test_policy_serde() {
        let policy: MissingValuePolicy =
            serde_json::from_str(r#"{"policy": "substitute", "defaults": {"rating": 3.0}}"#).unwrap();
        assert_eq!(policy, MissingValuePolicy::substitute([("rating", 3.0)]));
        let reject: MissingValuePolicy = serde_json::from_str(r#"{"policy": "reject"}"#).unwrap();
        assert_eq!(reject, MissingValuePolicy::Reject);
    }
}
