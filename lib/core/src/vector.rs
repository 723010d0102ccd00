use crate::id::EntityId;
use crate::numeric;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A vector of floating point numbers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Vector {
    data: Vec<f32>,
}

impl Vector {
    #[inline]
    #[must_use]
    pub fn new(data: Vec<f32>) -> Self {
        Self { data }
    }

    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.data.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Raw cosine similarity in [-1, 1].
    ///
    /// Returns 0.0 when either norm is `<= epsilon` or the dimensions differ.
    /// Callers that need dimension errors validate before calling.
    #[inline]
    pub fn cosine_similarity(&self, other: &Vector, epsilon: f64) -> f64 {
        if self.dim() != other.dim() {
            return 0.0;
        }
        numeric::cosine(&self.data, &other.data, epsilon)
    }

    #[inline]
    pub fn norm(&self) -> f64 {
        numeric::norm(&self.data)
    }

    pub fn first_non_finite(&self) -> Option<usize> {
        self.data.iter().position(|x| !x.is_finite())
    }

    /// Normalize the vector to unit length
    #[inline]
    pub fn normalize(&mut self) {
        let norm = self.norm();
        if norm > f64::from(f32::EPSILON) {
            let inv_norm = (1.0 / norm) as f32;
            for x in &mut self.data {
                *x *= inv_norm;
            }
        }
    }

    #[inline]
    #[must_use]
    pub fn normalized(&self) -> Self {
        let mut v = self.clone();
        v.normalize();
        v
    }
}

impl From<Vec<f32>> for Vector {
    fn from(data: Vec<f32>) -> Self {
        Self::new(data)
    }
}

/// Embedding of one entity, produced by an embedding provider.
///
/// The engine only ever borrows these. `payload` holds the descriptive
/// attributes (category, difficulty, ...) that candidate filters inspect.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileVector {
    pub owner_id: EntityId,
    pub vector: Vector,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
}

impl ProfileVector {
    #[must_use]
    pub fn new(owner_id: impl Into<EntityId>, vector: impl Into<Vector>) -> Self {
        Self {
            owner_id: owner_id.into(),
            vector: vector.into(),
            generated_at: None,
            payload: None,
        }
    }

    #[must_use]
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = Some(payload);
        self
    }

    #[must_use]
    pub fn with_generated_at(mut self, at: DateTime<Utc>) -> Self {
        self.generated_at = Some(at);
        self
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.vector.dim()
    }
}
