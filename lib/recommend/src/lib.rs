//! # rankwise Recommend
//!
//! One stable entry point for both recommendation modes.
//!
//! - [`Recommender::rank_alternatives`] - TOPSIS ranking (e.g. best-fit therapist for a case)
//! - [`Recommender::recommend_similar`] - Embedding similarity (e.g. activities for a child)
//!
//! Each call returns a [`RecommendationBundle`] carrying the results, the
//! generation timestamp and the exact parameters used, so a caller can store
//! it as an audit record and reproduce the run.
//!
//! ## Example
//!
//! ```rust
//! use rankwise_recommend::{AuditContext, MemoryAuditSink, Recommender};
//! use rankwise_core::EngineConfig;
//! use rankwise_topsis::{Alternative, Criterion};
//! use std::sync::Arc;
//!
//! let sink = Arc::new(MemoryAuditSink::new());
//! let recommender = Recommender::new(EngineConfig::default())
//!     .unwrap()
//!     .with_audit_sink(sink.clone());
//!
//! let criteria = vec![Criterion::cost("carga", 0.5), Criterion::benefit("rating", 0.5)];
//! let staff = vec![
//!     Alternative::new(1u64, vec![12.0, 4.8]),
//!     Alternative::new(2u64, vec![4.0, 4.1]),
//! ];
//! let ctx = AuditContext::new().with_actor("coordinator-7");
//! let bundle = recommender.rank_alternatives("case-17", &criteria, &staff, Some(&ctx)).unwrap();
//!
//! assert_eq!(bundle.len(), 2);
//! assert_eq!(sink.len(), 1);
//! ```

pub mod audit;
pub mod bundle;
pub mod orchestrator;

pub use audit::{AuditContext, AuditSink, MemoryAuditSink, TracingAuditSink};
pub use bundle::{
    BundleResults, Mode, Parameters, RecommendationBundle, SimilarityParameters, TopsisParameters,
};
pub use orchestrator::{Recommender, SimilarityQuery};
