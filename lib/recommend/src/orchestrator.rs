//! Recommendation orchestrator
//!
//! The single boundary the surrounding application calls. Delegates to the
//! TOPSIS ranker or the similarity engine and wraps the output in a
//! [`RecommendationBundle`]. No retries, no caching, no state between calls.

use crate::audit::{AuditContext, AuditSink};
use crate::bundle::{
    BundleResults, Parameters, RecommendationBundle, SimilarityParameters, TopsisParameters,
};
use rankwise_core::{
    CancellationToken, EngineConfig, EntityId, Filter, FilterCondition, PayloadFilter,
    ProfileVector, Result,
};
use rankwise_similarity::SimilarityEngine;
use rankwise_topsis::{
    normalized_weights, Alternative, Criterion, MissingValuePolicy, RawAlternative, Substitution,
    TopsisRanker,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// `top_n` and filter for one similarity request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimilarityQuery {
    /// Falls back to `EngineConfig::default_top_n`
    #[serde(default)]
    pub top_n: Option<usize>,
    #[serde(default)]
    pub filter: Option<FilterCondition>,
}

impl SimilarityQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn top_n(mut self, top_n: usize) -> Self {
        self.top_n = Some(top_n);
        self
    }

    pub fn filter(mut self, condition: FilterCondition) -> Self {
        self.filter = Some(condition);
        self
    }
}

#[derive(Clone)]
pub struct Recommender {
    config: EngineConfig,
    topsis: TopsisRanker,
    similarity: SimilarityEngine,
    audit: Option<Arc<dyn AuditSink>>,
}

impl std::fmt::Debug for Recommender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recommender")
            .field("config", &self.config)
            .field("audit", &self.audit.is_some())
            .finish()
    }
}

impl Recommender {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            topsis: TopsisRanker::new(&config),
            similarity: SimilarityEngine::new(config.clone()),
            config,
            audit: None,
        })
    }

    pub fn with_audit_sink(mut self, sink: Arc<dyn AuditSink>) -> Self {
        self.audit = Some(sink);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Rank staff (or any alternatives) for `subject_id` with TOPSIS.
    pub fn rank_alternatives(
        &self,
        subject_id: impl Into<EntityId>,
        criteria: &[Criterion],
        alternatives: &[Alternative],
        context: Option<&AuditContext>,
    ) -> Result<RecommendationBundle> {
        self.rank_with_provenance(subject_id.into(), criteria, alternatives, None, Vec::new(), context)
    }

    /// Complete `raw` with `policy`, then rank. Every substituted value is
    /// listed in the bundle parameters.
    pub fn rank_incomplete(
        &self,
        subject_id: impl Into<EntityId>,
        criteria: &[Criterion],
        raw: &[RawAlternative],
        policy: &MissingValuePolicy,
        context: Option<&AuditContext>,
    ) -> Result<RecommendationBundle> {
        let resolved = policy.resolve(criteria, raw)?;
        if !resolved.substitutions.is_empty() {
            debug!(count = resolved.substitutions.len(), "substituted missing criterion values");
        }
        self.rank_with_provenance(
            subject_id.into(),
            criteria,
            &resolved.alternatives,
            Some(policy.clone()),
            resolved.substitutions,
            context,
        )
    }

    fn rank_with_provenance(
        &self,
        subject_id: EntityId,
        criteria: &[Criterion],
        alternatives: &[Alternative],
        missing_values: Option<MissingValuePolicy>,
        substitutions: Vec<Substitution>,
        context: Option<&AuditContext>,
    ) -> Result<RecommendationBundle> {
        let ranked = self.topsis.rank(criteria, alternatives)?;

        let parameters = Parameters::Topsis(TopsisParameters {
            criteria: criteria.to_vec(),
            normalized_weights: normalized_weights(criteria),
            zero_norm_epsilon: self.config.zero_norm_epsilon,
            missing_values,
            substitutions,
        });

        Ok(self.finish(RecommendationBundle::new(
            subject_id,
            BundleResults::Topsis(ranked),
            parameters,
            context.cloned(),
        )))
    }

    /// Recommend catalog entries similar to `subject`.
    pub fn recommend_similar(
        &self,
        subject: &ProfileVector,
        catalog: &[ProfileVector],
        query: &SimilarityQuery,
        context: Option<&AuditContext>,
    ) -> Result<RecommendationBundle> {
        self.recommend_similar_with_cancel(subject, catalog, query, None, context, None)
    }

    /// Full form of [`recommend_similar`](Self::recommend_similar).
    ///
    /// `predicate` is an in-process filter applied together with
    /// `query.filter`. It cannot be serialized, so the bundle only records
    /// that one was used (`custom_predicate`); such runs are not
    /// reproducible from the bundle alone.
    pub fn recommend_similar_with_cancel(
        &self,
        subject: &ProfileVector,
        catalog: &[ProfileVector],
        query: &SimilarityQuery,
        predicate: Option<&dyn Filter>,
        context: Option<&AuditContext>,
        cancel: Option<&CancellationToken>,
    ) -> Result<RecommendationBundle> {
        let top_n = query.top_n.unwrap_or(self.config.default_top_n);
        let recorded = query.filter.clone().map(PayloadFilter::new);

        let combined = |candidate: &ProfileVector| {
            recorded.as_ref().map_or(true, |f| f.matches(candidate))
                && predicate.map_or(true, |p| p.matches(candidate))
        };
        let filter: Option<&dyn Filter> = if recorded.is_some() || predicate.is_some() {
            Some(&combined)
        } else {
            None
        };

        let outcome = self
            .similarity
            .recommend_with_cancel(subject, catalog, top_n, filter, cancel)?;

        let parameters = Parameters::Similarity(SimilarityParameters {
            top_n,
            filter: query.filter.clone(),
            remap: self.config.remap,
            zero_norm_epsilon: self.config.zero_norm_epsilon,
            custom_predicate: predicate.is_some(),
            candidate_count: outcome.candidate_count,
            filtered_count: outcome.filtered_count,
        });

        Ok(self.finish(RecommendationBundle::new(
            subject.owner_id.clone(),
            BundleResults::Similarity(outcome.results),
            parameters,
            context.cloned(),
        )))
    }

    fn finish(&self, bundle: RecommendationBundle) -> RecommendationBundle {
        debug!(run_id = %bundle.run_id, results = bundle.len(), "bundle ready");
        if let Some(sink) = &self.audit {
            sink.record(&bundle);
        }
        bundle
    }
}
