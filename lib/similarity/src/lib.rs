//! # rankwise Similarity
//!
//! Content-similarity recommendation over profile embeddings.
//!
//! ## Features
//!
//! - **Top-N ranking**: Remapped cosine similarity with stable tie-breaks
//! - **Candidate filters**: Pruned before scoring, never after
//! - **Cancellation**: Long sweeps poll a [`CancellationToken`]
//! - **Embedding capability**: Pluggable providers with a deterministic hash fallback
//!
//! ## Example
//!
//! ```rust
//! use rankwise_similarity::SimilarityEngine;
//! use rankwise_core::ProfileVector;
//!
//! let engine = SimilarityEngine::default();
//! let subject = ProfileVector::new("child-1", vec![1.0, 0.0, 0.0]);
//! let catalog = vec![
//!     ProfileVector::new("A", vec![1.0, 0.0, 0.0]),
//!     ProfileVector::new("B", vec![0.0, 1.0, 0.0]),
//!     ProfileVector::new("C", vec![0.7, 0.7, 0.0]),
//! ];
//!
//! let results = engine.recommend(&subject, &catalog, 2, None).unwrap();
//! assert_eq!(results[0].candidate_id.to_string(), "A");
//! assert_eq!(results[1].candidate_id.to_string(), "C");
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ Attributes  │────>│  Provider   │────>│  Profiles   │
//! │  (caller)   │     │ (attrs→v)   │     │  (catalog)  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                                                │
//!                      ┌─────────────┐           │
//!                      │   Engine    │<──────────┘
//!                      │ filter→score│
//!                      └─────────────┘
//!                             │
//!                      ┌─────────────┐
//!                      │   Top-N     │
//!                      └─────────────┘
//! ```
//!
//! [`CancellationToken`]: rankwise_core::CancellationToken

pub mod embedder;
pub mod engine;

pub use embedder::{embed_profile, EmbeddingProvider, FallbackProvider, HashEmbedder, DEFAULT_HASH_DIM};
pub use engine::{Recommendations, SimilarityEngine, SimilarityResult};
