//! JSON request layer used by the CLI
//!
//! Mirrors the wire shapes callers hand to the engine: a decision matrix
//! for TOPSIS, or a subject plus catalog for similarity.

use anyhow::{bail, Context};
use rankwise_core::{EngineConfig, EntityId, FilterCondition, ProfileVector, Vector};
use rankwise_recommend::{AuditContext, RecommendationBundle, Recommender, SimilarityQuery};
use rankwise_similarity::{embed_profile, EmbeddingProvider};
use rankwise_topsis::{Alternative, Criterion, MissingValuePolicy, RawAlternative};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::Read;
use std::path::Path;

fn default_subject() -> EntityId {
    EntityId::String("subject".to_string())
}

/// `{criteria: [...], alternatives: [{id, values}]}`; a `null` value is
/// missing and needs `missing_values`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopsisRequest {
    #[serde(default = "default_subject")]
    pub subject_id: EntityId,
    pub criteria: Vec<Criterion>,
    pub alternatives: Vec<RawAlternative>,
    #[serde(default)]
    pub missing_values: Option<MissingValuePolicy>,
    #[serde(default)]
    pub context: Option<AuditContext>,
}

impl TopsisRequest {
    pub fn run(&self, recommender: &Recommender) -> anyhow::Result<RecommendationBundle> {
        let complete: Option<Vec<Alternative>> = self
            .alternatives
            .iter()
            .map(|raw| {
                raw.values
                    .iter()
                    .copied()
                    .collect::<Option<Vec<f64>>>()
                    .map(|values| Alternative::new(raw.id.clone(), values))
            })
            .collect();

        let bundle = match (&self.missing_values, complete) {
            (None, Some(alternatives)) => recommender.rank_alternatives(
                self.subject_id.clone(),
                &self.criteria,
                &alternatives,
                self.context.as_ref(),
            )?,
            (policy, _) => recommender.rank_incomplete(
                self.subject_id.clone(),
                &self.criteria,
                &self.alternatives,
                &policy.clone().unwrap_or_default(),
                self.context.as_ref(),
            )?,
        };
        Ok(bundle)
    }
}

/// A catalog entry given either as a vector or as attributes to embed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateInput {
    pub id: EntityId,
    #[serde(default)]
    pub vector: Option<Vec<f32>>,
    #[serde(default)]
    pub attributes: Option<Value>,
}

impl CandidateInput {
    fn into_profile(self, provider: &dyn EmbeddingProvider) -> anyhow::Result<ProfileVector> {
        match (self.vector, self.attributes) {
            (Some(vector), attributes) => {
                let mut profile = ProfileVector::new(self.id, Vector::new(vector));
                profile.payload = attributes;
                Ok(profile)
            }
            (None, Some(attributes)) => {
                let id = self.id.clone();
                embed_profile(provider, self.id, attributes)
                    .with_context(|| format!("failed to embed '{}'", id))
            }
            (None, None) => bail!("'{}' has neither a vector nor attributes", self.id),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityRequest {
    #[serde(default = "default_subject")]
    pub subject_id: EntityId,
    #[serde(default)]
    pub subject_vector: Option<Vec<f32>>,
    #[serde(default)]
    pub subject_attributes: Option<Value>,
    #[serde(default)]
    pub candidates: Vec<CandidateInput>,
    #[serde(default)]
    pub top_n: Option<usize>,
    #[serde(default)]
    pub filter: Option<FilterCondition>,
    #[serde(default)]
    pub context: Option<AuditContext>,
}

impl SimilarityRequest {
    /// Resolve the subject and catalog, embedding attribute-only entries
    pub fn into_profiles(
        self,
        provider: &dyn EmbeddingProvider,
    ) -> anyhow::Result<(ProfileVector, Vec<ProfileVector>)> {
        let subject = CandidateInput {
            id: self.subject_id,
            vector: self.subject_vector,
            attributes: self.subject_attributes,
        }
        .into_profile(provider)
        .context("invalid subject")?;

        let catalog = self
            .candidates
            .into_iter()
            .map(|c| c.into_profile(provider))
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok((subject, catalog))
    }

    pub fn run(
        self,
        recommender: &Recommender,
        provider: &dyn EmbeddingProvider,
    ) -> anyhow::Result<RecommendationBundle> {
        let query = SimilarityQuery {
            top_n: self.top_n,
            filter: self.filter.clone(),
        };
        let context = self.context.clone();
        let (subject, catalog) = self.into_profiles(provider)?;
        Ok(recommender.recommend_similar(&subject, &catalog, &query, context.as_ref())?)
    }
}

/// Read a file, or stdin for `-`
pub fn read_input(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read stdin")?;
        return Ok(buffer);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {:?}", path))
}

/// Load a JSON engine config, or the defaults when no path is given
pub fn load_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    match path {
        Some(path) => {
            let raw = read_input(path)?;
            EngineConfig::from_json_str(&raw).with_context(|| format!("invalid config {:?}", path))
        }
        None => Ok(EngineConfig::default()),
    }
}
