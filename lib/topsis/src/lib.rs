//! # rankwise TOPSIS
//!
//! Multi-criteria decision ranking used to pick the best-fit staff member
//! for a case.
//!
//! ## Example
//!
//! ```rust
//! use rankwise_topsis::{Alternative, Criterion, TopsisRanker};
//!
//! let criteria = vec![
//!     Criterion::cost("carga", 0.4),
//!     Criterion::benefit("sesiones", 0.3),
//!     Criterion::benefit("rating", 0.3),
//! ];
//! let alternatives = vec![
//!     Alternative::new(1u64, vec![10.0, 5.0, 4.5]),
//!     Alternative::new(2u64, vec![5.0, 8.0, 4.0]),
//!     Alternative::new(3u64, vec![20.0, 2.0, 3.0]),
//! ];
//!
//! let ranked = TopsisRanker::default().rank(&criteria, &alternatives).unwrap();
//! assert_eq!(ranked[0].id.to_string(), "2");
//! assert_eq!(ranked[0].rank, 1);
//! ```
//!
//! ## Algorithm
//!
//! ```text
//! weights / sum ──> vector-normalize columns ──> weight ──> A+ / A-
//!                                                            │
//!                          score = d- / (d+ + d-) <── d+, d- ┘
//! ```
//!
//! A column whose norm is zero contributes zero. A zero denominator
//! (identical alternatives, or only one) scores 1.0.

pub mod criterion;
pub mod matrix;
pub mod missing;
pub mod ranker;

pub use criterion::{normalized_weights, Criterion, Direction};
pub use matrix::{validate_criteria, Alternative, DecisionMatrix};
pub use missing::{MissingValuePolicy, RawAlternative, Resolved, Substitution};
pub use ranker::{RankedAlternative, TopsisRanker};
