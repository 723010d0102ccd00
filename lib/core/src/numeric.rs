//! Shared numeric helpers
//!
//! Accumulation is done in `f64` regardless of the storage type so that
//! both rankers see the same precision.

use ordered_float::OrderedFloat;
use std::cmp::Ordering;

/// Dot product of two equal-length slices
#[inline]
pub fn dot(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| f64::from(*x) * f64::from(*y))
        .sum()
}

#[inline]
pub fn squared_norm(a: &[f32]) -> f64 {
    a.iter().map(|x| f64::from(*x) * f64::from(*x)).sum()
}

#[inline]
pub fn norm(a: &[f32]) -> f64 {
    squared_norm(a).sqrt()
}

/// Cosine similarity in [-1, 1], 0.0 if either norm is `<= epsilon`.
///
/// Computed as `dot / sqrt(|a|^2 * |b|^2)` so that `cosine(v, v)` is exactly
/// 1.0 and `cosine(a, b) == cosine(b, a)` bit for bit.
pub fn cosine(a: &[f32], b: &[f32], epsilon: f64) -> f64 {
    let sq_a = squared_norm(a);
    let sq_b = squared_norm(b);
    if sq_a.sqrt() <= epsilon || sq_b.sqrt() <= epsilon {
        return 0.0;
    }
    let cos = dot(a, b) / (sq_a * sq_b).sqrt();
    cos.clamp(-1.0, 1.0)
}

/// Euclidean distance between two equal-length `f64` rows
#[inline]
pub fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// Descending comparison on scores
#[inline]
pub fn descending(a: f64, b: f64) -> Ordering {
    OrderedFloat(b).cmp(&OrderedFloat(a))
}

/// Stable sort by descending score. Equal scores keep their input order.
pub fn sort_by_score_desc<T>(items: &mut [T], score: impl Fn(&T) -> f64) {
    items.sort_by(|a, b| descending(score(a), score(b)));
}

/// Round for display. Never used on internal values.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot_and_norm() {
        assert_eq!(dot(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]), 32.0);
        assert_eq!(norm(&[3.0, 4.0]), 5.0);
    }

    #[test]
    fn test_cosine_self_is_exactly_one() {
        let v = [0.3f32, -1.7, 4.2, 0.01, 9.9];
        assert_eq!(cosine(&v, &v, 0.0), 1.0);
    }

    #[test]
    fn test_cosine_symmetric() {
        let a = [0.3f32, -1.7, 4.2];
        let b = [1.1f32, 0.2, -0.5];
        assert_eq!(cosine(&a, &b, 0.0), cosine(&b, &a, 0.0));
    }

    #[test]
    fn test_cosine_epsilon() {
        let tiny = [1e-7f32, 0.0];
        let v = [1.0f32, 0.0];
        assert_eq!(cosine(&tiny, &v, 1e-6), 0.0);
        assert!((cosine(&tiny, &v, 0.0) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_euclidean() {
        assert_eq!(euclidean(&[0.0, 0.0], &[3.0, 4.0]), 5.0);
    }

    #[test]
    fn test_sort_is_stable() {
        let mut items = vec![("a", 0.5), ("b", 0.9), ("c", 0.5), ("d", 0.9)];
        sort_by_score_desc(&mut items, |i| i.1);
        let order: Vec<_> = items.iter().map(|i| i.0).collect();
        assert_eq!(order, vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.935729197, 4), 0.9357);
        assert_eq!(round_to(0.85355339, 2), 0.85);
    }
}
