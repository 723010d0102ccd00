// Candidate filters applied before similarity scoring
use crate::vector::ProfileVector;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub trait Filter: Send + Sync {
    fn matches(&self, candidate: &ProfileVector) -> bool;
}

impl<F> Filter for F
where
    F: Fn(&ProfileVector) -> bool + Send + Sync,
{
    fn matches(&self, candidate: &ProfileVector) -> bool {
        self(candidate)
    }
}

/// Filter over the candidate payload, serializable so it can be recorded
/// alongside the results it produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PayloadFilter {
    condition: FilterCondition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum FilterCondition {
    Eq { field: String, value: Value },
    Ne { field: String, value: Value },
    Gt { field: String, value: f64 },
    Lt { field: String, value: f64 },
    Gte { field: String, value: f64 },
    Lte { field: String, value: f64 },
    Contains { field: String, value: String },
    In { field: String, values: Vec<Value> },
    And { all: Vec<FilterCondition> },
    Or { any: Vec<FilterCondition> },
    Not { condition: Box<FilterCondition> },
}

impl FilterCondition {
    /// `field == value`, e.g. a category
    pub fn equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        FilterCondition::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    /// `field <= max`, e.g. a difficulty ceiling
    pub fn at_most(field: impl Into<String>, max: f64) -> Self {
        FilterCondition::Lte {
            field: field.into(),
            value: max,
        }
    }

    pub fn and(self, other: FilterCondition) -> Self {
        match self {
            FilterCondition::And { mut all } => {
                all.push(other);
                FilterCondition::And { all }
            }
            first => FilterCondition::And {
                all: vec![first, other],
            },
        }
    }
}

impl PayloadFilter {
    pub fn new(condition: FilterCondition) -> Self {
        Self { condition }
    }

    pub fn condition(&self) -> &FilterCondition {
        &self.condition
    }

    /// Dotted paths (`"meta.level"`) walk nested objects.
    fn get_field_value<'a>(candidate: &'a ProfileVector, field: &str) -> Option<&'a Value> {
        let field = field.strip_prefix('.').unwrap_or(field);
        let mut current = candidate.payload.as_ref()?;
        for part in field.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn numeric(candidate: &ProfileVector, field: &str) -> Option<f64> {
        Self::get_field_value(candidate, field).and_then(Value::as_f64)
    }

    fn matches_condition(condition: &FilterCondition, candidate: &ProfileVector) -> bool {
        match condition {
            FilterCondition::Eq { field, value } => Self::get_field_value(candidate, field)
                .map(|v| v == value)
                .unwrap_or(false),
            FilterCondition::Ne { field, value } => Self::get_field_value(candidate, field)
                .map(|v| v != value)
                .unwrap_or(true),
            FilterCondition::Gt { field, value } => Self::numeric(candidate, field)
                .map(|v| v > *value)
                .unwrap_or(false),
            FilterCondition::Lt { field, value } => Self::numeric(candidate, field)
                .map(|v| v < *value)
                .unwrap_or(false),
            FilterCondition::Gte { field, value } => Self::numeric(candidate, field)
                .map(|v| v >= *value)
                .unwrap_or(false),
            FilterCondition::Lte { field, value } => Self::numeric(candidate, field)
                .map(|v| v <= *value)
                .unwrap_or(false),
            FilterCondition::Contains { field, value } => {
                match Self::get_field_value(candidate, field) {
                    Some(Value::String(s)) => s.contains(value.as_str()),
                    Some(Value::Array(items)) => items.iter().any(|i| i.as_str() == Some(value.as_str())),
                    _ => false,
                }
            }
            FilterCondition::In { field, values } => Self::get_field_value(candidate, field)
                .map(|v| values.contains(v))
                .unwrap_or(false),
            FilterCondition::And { all } => all.iter().all(|c| Self::matches_condition(c, candidate)),
            FilterCondition::Or { any } => any.iter().any(|c| Self::matches_condition(c, candidate)),
            FilterCondition::Not { condition } => !Self::matches_condition(condition, candidate),
        }
    }
}

impl From<FilterCondition> for PayloadFilter {
    fn from(condition: FilterCondition) -> Self {
        Self::new(condition)
    }
}

impl Filter for PayloadFilter {
    fn matches(&self, candidate: &ProfileVector) -> bool {
        Self::matches_condition(&self.condition, candidate)
    }
}
