//! # rankwise
//!
//! Multi-criteria ranking and content-similarity recommendation for a
//! therapy-center back office.
//!
//! Two modes behind one boundary:
//!
//! - **TOPSIS**: picks the best-fit staff member for a case from weighted
//!   benefit/cost criteria (load, sessions, rating, ...)
//! - **Similarity**: ranks activities and resources against a child's
//!   profile embedding
//!
//! ## Quick Start
//!
//! ### As a CLI
//!
//! ```bash
//! rankwise rank --input decision.json --pretty
//! rankwise similar --input catalog.json --config engine.json
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use rankwise::prelude::*;
//!
//! let recommender = Recommender::new(EngineConfig::default()).unwrap();
//!
//! let subject = ProfileVector::new("child-1", vec![1.0, 0.0, 0.0]);
//! let catalog = vec![
//!     ProfileVector::new("A", vec![1.0, 0.0, 0.0]),
//!     ProfileVector::new("B", vec![0.0, 1.0, 0.0]),
//!     ProfileVector::new("C", vec![0.7, 0.7, 0.0]),
//! ];
//! let bundle = recommender
//!     .recommend_similar(&subject, &catalog, &SimilarityQuery::new().top_n(2), None)
//!     .unwrap();
//! assert_eq!(bundle.len(), 2);
//! ```
//!
//! ## Crate Structure
//!
//! - `rankwise-core` - Ids, vectors, filters, numeric helpers, configuration, errors
//! - `rankwise-topsis` - TOPSIS ranker and missing-value policy
//! - `rankwise-similarity` - Similarity engine and embedding providers
//! - `rankwise-recommend` - Orchestrator, bundles and audit side-channel

pub mod request;

// Re-export core types
pub use rankwise_core::{
    numeric, CancellationToken, EngineConfig, EntityId, Error, Filter, FilterCondition,
    PayloadFilter, ProfileVector, RemapPolicy, Result, ValidationError, Vector,
};

// Re-export rankers
pub use rankwise_similarity::{
    embed_profile, EmbeddingProvider, FallbackProvider, HashEmbedder, SimilarityEngine,
    SimilarityResult, DEFAULT_HASH_DIM,
};
pub use rankwise_topsis::{
    Alternative, Criterion, Direction, MissingValuePolicy, RankedAlternative, RawAlternative,
    Substitution, TopsisRanker,
};

// Re-export orchestrator
pub use rankwise_recommend::{
    AuditContext, AuditSink, BundleResults, MemoryAuditSink, Mode, Parameters,
    RecommendationBundle, Recommender, SimilarityQuery, TracingAuditSink,
};

pub mod prelude {
    pub use crate::{
        Alternative, AuditContext, Criterion, Direction, EngineConfig, EntityId, FilterCondition,
        ProfileVector, RecommendationBundle, Recommender, SimilarityQuery,
    };
}
