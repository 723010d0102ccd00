//! # rankwise Core
//!
//! Shared building blocks for the rankwise ranking and recommendation engines.
//!
//! - [`EntityId`] - Opaque, caller-owned identifier
//! - [`Vector`] / [`ProfileVector`] - Embeddings consumed by similarity ranking
//! - [`Filter`] / [`PayloadFilter`] - Candidate pruning before scoring
//! - [`EngineConfig`] - Explicit engine configuration
//! - [`Error`] / [`ValidationError`] - Error taxonomy shared by every crate
//!
//! ## Example
//!
//! ```rust
//! use rankwise_core::{numeric, ProfileVector, RemapPolicy};
//!
//! let a = ProfileVector::new("A", vec![1.0, 0.0, 0.0]);
//! let c = ProfileVector::new("C", vec![0.7, 0.7, 0.0]);
//! let cos = a.vector.cosine_similarity(&c.vector, 0.0);
//! let score = RemapPolicy::Shifted.apply(cos);
//! assert!((score - 0.8536).abs() < 1e-4);
//! assert_eq!(numeric::round_to(score, 4), 0.8536);
//! ```

pub mod cancel;
pub mod config;
pub mod error;
pub mod filter;
pub mod id;
pub mod numeric;
pub mod vector;

pub use cancel::CancellationToken;
pub use config::{EngineConfig, RemapPolicy, MAX_TOP_N, MIN_TOP_N};
pub use error::{Error, Result, ValidationError};
pub use filter::{Filter, FilterCondition, PayloadFilter};
pub use id::EntityId;
pub use vector::{ProfileVector, Vector};
