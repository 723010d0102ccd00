//! Vector similarity engine
//!
//! Scores a catalog of candidate embeddings against a subject embedding and
//! returns the top-N by remapped cosine similarity.

use rankwise_core::{
    numeric, CancellationToken, EngineConfig, EntityId, Error, Filter, ProfileVector, Result,
    ValidationError, Vector, MAX_TOP_N, MIN_TOP_N,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityResult {
    pub candidate_id: EntityId,
    /// Remapped similarity in [0, 1]
    pub score: f64,
    pub rank: usize,
}

/// Outcome of a sweep: the ranked results plus how many candidates
/// survived the filter.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendations {
    pub results: Vec<SimilarityResult>,
    pub candidate_count: usize,
    pub filtered_count: usize,
}

struct Scored<'a> {
    id: &'a EntityId,
    score: f64,
}

#[derive(Debug, Clone, Default)]
pub struct SimilarityEngine {
    config: EngineConfig,
}

impl SimilarityEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Public similarity score between two vectors in [0, 1].
    ///
    /// This is the only place the remap policy is applied.
    pub fn similarity(&self, a: &Vector, b: &Vector) -> Result<f64> {
        if a.dim() != b.dim() {
            return Err(ValidationError::DimensionMismatch {
                id: "vector".to_string(),
                expected: a.dim(),
                actual: b.dim(),
            }
            .into());
        }
        Ok(self.score(a, b))
    }

    #[inline]
    fn score(&self, a: &Vector, b: &Vector) -> f64 {
        let cosine = numeric::cosine(a.as_slice(), b.as_slice(), self.config.zero_norm_epsilon);
        self.config.remap.apply(cosine)
    }

    pub fn recommend(
        &self,
        subject: &ProfileVector,
        candidates: &[ProfileVector],
        top_n: usize,
        filter: Option<&dyn Filter>,
    ) -> Result<Vec<SimilarityResult>> {
        self.recommend_with_cancel(subject, candidates, top_n, filter, None)
            .map(|r| r.results)
    }

    /// Like [`recommend`](Self::recommend), polling `cancel` between candidates.
    pub fn recommend_with_cancel(
        &self,
        subject: &ProfileVector,
        candidates: &[ProfileVector],
        top_n: usize,
        filter: Option<&dyn Filter>,
        cancel: Option<&CancellationToken>,
    ) -> Result<Recommendations> {
        self.validate(subject, candidates, top_n)?;
        debug!(
            subject = %subject.owner_id,
            candidates = candidates.len(),
            top_n,
            filtered = filter.is_some(),
            "recommending similar candidates"
        );

        if candidates.is_empty() {
            return Ok(Recommendations {
                results: Vec::new(),
                candidate_count: 0,
                filtered_count: 0,
            });
        }

        if subject.vector.norm() <= self.config.zero_norm_epsilon {
            warn!(subject = %subject.owner_id, "subject vector has zero norm; every candidate scores the same");
        }

        let mut scored = if candidates.len() >= self.config.parallel_threshold {
            self.score_parallel(subject, candidates, filter, cancel)?
        } else {
            self.score_sequential(subject, candidates, filter, cancel)?
        };
        let filtered_count = scored.len();

        numeric::sort_by_score_desc(&mut scored, |s| s.score);
        scored.truncate(top_n);

        let results = scored
            .into_iter()
            .enumerate()
            .map(|(position, s)| SimilarityResult {
                candidate_id: s.id.clone(),
                score: s.score,
                rank: position + 1,
            })
            .collect();

        Ok(Recommendations {
            results,
            candidate_count: candidates.len(),
            filtered_count,
        })
    }

    fn validate(&self, subject: &ProfileVector, candidates: &[ProfileVector], top_n: usize) -> Result<()> {
        if !(MIN_TOP_N..=MAX_TOP_N).contains(&top_n) {
            return Err(ValidationError::TopNOutOfRange {
                top_n,
                min: MIN_TOP_N,
                max: MAX_TOP_N,
            }
            .into());
        }

        if subject.vector.is_empty() {
            return Err(ValidationError::EmptyVector(subject.owner_id.to_string()).into());
        }
        check_finite(subject)?;

        if let Some(expected) = self.config.vector_dim {
            if subject.dim() != expected {
                return Err(ValidationError::DimensionMismatch {
                    id: subject.owner_id.to_string(),
                    expected,
                    actual: subject.dim(),
                }
                .into());
            }
        }

        let expected = subject.dim();
        for candidate in candidates {
            if candidate.dim() != expected {
                return Err(ValidationError::DimensionMismatch {
                    id: candidate.owner_id.to_string(),
                    expected,
                    actual: candidate.dim(),
                }
                .into());
            }
            check_finite(candidate)?;
        }
        Ok(())
    }

    fn score_sequential<'a>(
        &self,
        subject: &ProfileVector,
        candidates: &'a [ProfileVector],
        filter: Option<&dyn Filter>,
        cancel: Option<&CancellationToken>,
    ) -> Result<Vec<Scored<'a>>> {
        let mut scored = Vec::with_capacity(candidates.len());
        for (processed, candidate) in candidates.iter().enumerate() {
            if cancel.is_some_and(CancellationToken::is_cancelled) {
                return Err(Error::Cancelled { processed });
            }
            if let Some(s) = self.score_candidate(subject, candidate, filter) {
                scored.push(s);
            }
        }
        Ok(scored)
    }

    /// Fans scoring out over rayon. `collect` keeps input order, so the
    /// stable sort afterwards breaks ties exactly as the sequential path.
    fn score_parallel<'a>(
        &self,
        subject: &ProfileVector,
        candidates: &'a [ProfileVector],
        filter: Option<&dyn Filter>,
        cancel: Option<&CancellationToken>,
    ) -> Result<Vec<Scored<'a>>> {
        let completed = AtomicUsize::new(0);
        let scored: Result<Vec<Option<Scored<'a>>>> = candidates
            .par_iter()
            .map(|candidate| {
                if cancel.is_some_and(CancellationToken::is_cancelled) {
                    return Err(Error::Cancelled {
                        processed: completed.load(Ordering::Relaxed),
                    });
                }
                let outcome = self.score_candidate(subject, candidate, filter);
                completed.fetch_add(1, Ordering::Relaxed);
                Ok(outcome)
            })
            .collect();
        Ok(scored?.into_iter().flatten().collect())
    }

    /// Filter first so excluded candidates are never scored.
    #[inline]
    fn score_candidate<'a>(
        &self,
        subject: &ProfileVector,
        candidate: &'a ProfileVector,
        filter: Option<&dyn Filter>,
    ) -> Option<Scored<'a>> {
        if let Some(f) = filter {
            if !f.matches(candidate) {
                return None;
            }
        }
        Some(Scored {
            id: &candidate.owner_id,
            score: self.score(&subject.vector, &candidate.vector),
        })
    }
}

fn check_finite(profile: &ProfileVector) -> Result<()> {
    match profile.vector.first_non_finite() {
        Some(index) => Err(ValidationError::NonFiniteValue {
            id: profile.owner_id.to_string(),
            index,
        }
        .into()),
        None => Ok(()),
    }
}
