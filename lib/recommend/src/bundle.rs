//! Result bundles with the provenance needed to audit or reproduce a run

use crate::audit::AuditContext;
use chrono::{DateTime, Utc};
use rankwise_core::{numeric, EntityId, FilterCondition, RemapPolicy};
use rankwise_similarity::SimilarityResult;
use rankwise_topsis::{Criterion, MissingValuePolicy, RankedAlternative, Substitution};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Topsis,
    Similarity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "items", rename_all = "snake_case")]
pub enum BundleResults {
    Topsis(Vec<RankedAlternative>),
    Similarity(Vec<SimilarityResult>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopsisParameters {
    /// Criteria exactly as supplied, weights unnormalized
    pub criteria: Vec<Criterion>,
    /// Weights actually used, in criterion order
    pub normalized_weights: Vec<f64>,
    pub zero_norm_epsilon: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing_values: Option<MissingValuePolicy>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub substitutions: Vec<Substitution>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityParameters {
    pub top_n: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<FilterCondition>,
    pub remap: RemapPolicy,
    pub zero_norm_epsilon: f64,
    /// An in-process predicate also pruned candidates; it is not recorded
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub custom_predicate: bool,
    pub candidate_count: usize,
    /// Candidates left after filtering
    pub filtered_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Parameters {
    Topsis(TopsisParameters),
    Similarity(SimilarityParameters),
}

/// Everything one orchestrator call produced.
///
/// The engine never persists these; the caller stores them as audit records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationBundle {
    pub run_id: Uuid,
    pub subject_id: EntityId,
    pub generated_at: DateTime<Utc>,
    pub results: BundleResults,
    pub parameters: Parameters,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<AuditContext>,
}

impl RecommendationBundle {
    pub(crate) fn new(
        subject_id: EntityId,
        results: BundleResults,
        parameters: Parameters,
        context: Option<AuditContext>,
    ) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            subject_id,
            generated_at: Utc::now(),
            results,
            parameters,
            context,
        }
    }

    pub fn mode(&self) -> Mode {
        match self.results {
            BundleResults::Topsis(_) => Mode::Topsis,
            BundleResults::Similarity(_) => Mode::Similarity,
        }
    }

    pub fn len(&self) -> usize {
        match &self.results {
            BundleResults::Topsis(r) => r.len(),
            BundleResults::Similarity(r) => r.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ranked(&self) -> Option<&[RankedAlternative]> {
        match &self.results {
            BundleResults::Topsis(r) => Some(r),
            BundleResults::Similarity(_) => None,
        }
    }

    pub fn similar(&self) -> Option<&[SimilarityResult]> {
        match &self.results {
            BundleResults::Similarity(r) => Some(r),
            BundleResults::Topsis(_) => None,
        }
    }

    /// Ids in rank order
    pub fn ids(&self) -> Vec<&EntityId> {
        match &self.results {
            BundleResults::Topsis(r) => r.iter().map(|a| &a.id).collect(),
            BundleResults::Similarity(r) => r.iter().map(|s| &s.candidate_id).collect(),
        }
    }

    /// Copy for display with scores and distances rounded to `decimals`.
    pub fn rounded(&self, decimals: u32) -> Self {
        let mut display = self.clone();
        match &mut display.results {
            BundleResults::Topsis(ranked) => {
                for r in ranked {
                    r.score = numeric::round_to(r.score, decimals);
                    r.distance_to_ideal = numeric::round_to(r.distance_to_ideal, decimals);
                    r.distance_to_anti_ideal = numeric::round_to(r.distance_to_anti_ideal, decimals);
                }
            }
            BundleResults::Similarity(similar) => {
                for s in similar {
                    s.score = numeric::round_to(s.score, decimals);
                }
            }
        }
        display
    }
}
