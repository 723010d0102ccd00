//! Audit side-channel
//!
//! The orchestrator hands every successfully produced bundle to an optional
//! [`AuditSink`]. Persisting it is the sink's business.

use crate::bundle::RecommendationBundle;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

/// Caller-supplied context copied into the bundle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_case: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
}

impl AuditContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    pub fn with_use_case(mut self, use_case: impl Into<String>) -> Self {
        self.use_case = Some(use_case.into());
        self
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }
}

pub trait AuditSink: Send + Sync {
    fn record(&self, bundle: &RecommendationBundle);
}

impl<F> AuditSink for F
where
    F: Fn(&RecommendationBundle) + Send + Sync,
{
    fn record(&self, bundle: &RecommendationBundle) {
        self(bundle)
    }
}

/// Keeps bundles in memory, in the order they were recorded
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    records: Mutex<Vec<RecommendationBundle>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    pub fn records(&self) -> Vec<RecommendationBundle> {
        self.records.lock().clone()
    }

    /// Drain everything recorded so far
    pub fn take(&self) -> Vec<RecommendationBundle> {
        std::mem::take(&mut *self.records.lock())
    }
}

impl AuditSink for MemoryAuditSink {
    fn record(&self, bundle: &RecommendationBundle) {
        self.records.lock().push(bundle.clone());
    }
}

/// Emits one `info` event per bundle
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, bundle: &RecommendationBundle) {
        info!(
            run_id = %bundle.run_id,
            mode = ?bundle.mode(),
            subject = %bundle.subject_id,
            results = bundle.len(),
            actor = bundle.context.as_ref().and_then(|c| c.actor.as_deref()).unwrap_or("-"),
            "recommendation produced"
        );
    }
}
