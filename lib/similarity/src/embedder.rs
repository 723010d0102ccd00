//! Embedding capability
//!
//! Vectors are produced outside the engine. Anything implementing
//! [`EmbeddingProvider`] can feed it, as long as all vectors in one call
//! share a dimension. [`HashEmbedder`] is the deterministic local variant;
//! [`FallbackProvider`] puts it behind a remote or model-backed provider.

use chrono::Utc;
use rankwise_core::{EntityId, Error, ProfileVector, Result, ValidationError, Vector};
use serde_json::{Number, Value};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Default dimension for hash embeddings
pub const DEFAULT_HASH_DIM: usize = 64;

pub trait EmbeddingProvider: Send + Sync {
    /// Short identifier, recorded when a fallback kicks in
    fn name(&self) -> &str;

    fn dimension(&self) -> usize;

    /// Embed an entity's descriptive attributes
    fn embed(&self, attributes: &Value) -> Result<Vector>;
}

/// Embed `attributes` and wrap them as a profile owned by `owner_id`.
///
/// The attributes are kept as the profile payload so candidate filters can
/// inspect them.
pub fn embed_profile(
    provider: &dyn EmbeddingProvider,
    owner_id: impl Into<EntityId>,
    attributes: Value,
) -> Result<ProfileVector> {
    let owner_id = owner_id.into();
    let vector = provider.embed(&attributes)?;
    if vector.dim() != provider.dimension() {
        return Err(Error::Embedding(format!(
            "{} returned {} dimensions for '{}', expected {}",
            provider.name(),
            vector.dim(),
            owner_id,
            provider.dimension()
        )));
    }
    Ok(ProfileVector::new(owner_id, vector)
        .with_generated_at(Utc::now())
        .with_payload(attributes))
}

/// Deterministic feature-hashing embedder.
///
/// Every scalar attribute becomes a `field=value` token, and string values
/// also contribute their words and character trigrams. Tokens are hashed
/// with SHA-256 so positions are stable across platforms and releases.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dim: usize,
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self {
            dim: DEFAULT_HASH_DIM,
        }
    }
}

impl HashEmbedder {
    pub fn new(dim: usize) -> Result<Self> {
        if dim == 0 {
            return Err(ValidationError::InvalidConfig("hash embedding dimension must be > 0".to_string()).into());
        }
        Ok(Self { dim })
    }

    fn bucket(&self, token: &str) -> usize {
        let digest = Sha256::digest(token.as_bytes());
        let mut head = [0u8; 8];
        head.copy_from_slice(&digest[..8]);
        (u64::from_le_bytes(head) % self.dim as u64) as usize
    }

    fn add_text(&self, vector: &mut [f32], text: &str) {
        let normalized = text.to_lowercase();
        for trigram in generate_trigrams(&normalized) {
            vector[self.bucket(&trigram)] += 1.0;
        }
        // Words contribute more than trigrams
        for word in normalized.split_whitespace() {
            vector[self.bucket(word)] += 2.0;
        }
    }

    fn add_value(&self, vector: &mut [f32], path: &str, value: &Value) {
        match value {
            Value::Null => {}
            Value::Bool(b) => vector[self.bucket(&format!("{}={}", path, b))] += 2.0,
            Value::Number(n) => vector[self.bucket(&format!("{}={}", path, number_token(n)))] += 2.0,
            Value::String(s) => {
                vector[self.bucket(&format!("{}={}", path, s.to_lowercase()))] += 2.0;
                self.add_text(vector, s);
            }
            Value::Array(items) => {
                for item in items {
                    self.add_value(vector, path, item);
                }
            }
            Value::Object(map) => {
                for (key, nested) in map {
                    let nested_path = if path.is_empty() {
                        key.clone()
                    } else {
                        format!("{}.{}", path, key)
                    };
                    self.add_value(vector, &nested_path, nested);
                }
            }
        }
    }
}

/// `2` and `2.0` are the same attribute value and must share a token.
fn number_token(n: &Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => format!("{}", f as i64),
        _ => n.to_string(),
    }
}

impl EmbeddingProvider for HashEmbedder {
    fn name(&self) -> &str {
        "hash"
    }

    fn dimension(&self) -> usize {
        self.dim
    }

    fn embed(&self, attributes: &Value) -> Result<Vector> {
        let mut data = vec![0.0f32; self.dim];
        self.add_value(&mut data, "", attributes);
        Ok(Vector::new(data).normalized())
    }
}

/// Character trigrams of a padded string
fn generate_trigrams(s: &str) -> HashSet<String> {
    let padded = format!("  {}  ", s);
    let chars: Vec<char> = padded.chars().collect();
    chars.windows(3).map(|w| w.iter().collect::<String>()).collect()
}

/// Uses `primary` and falls back to `fallback` when it fails or returns a
/// vector of the wrong dimension.
pub struct FallbackProvider<P, F> {
    primary: P,
    fallback: F,
}

impl<P: EmbeddingProvider, F: EmbeddingProvider> FallbackProvider<P, F> {
    pub fn new(primary: P, fallback: F) -> Result<Self> {
        if primary.dimension() != fallback.dimension() {
            return Err(ValidationError::InvalidConfig(format!(
                "fallback provider {} has dimension {}, primary {} has {}",
                fallback.name(),
                fallback.dimension(),
                primary.name(),
                primary.dimension()
            ))
            .into());
        }
        Ok(Self { primary, fallback })
    }
}

impl<P: EmbeddingProvider, F: EmbeddingProvider> EmbeddingProvider for FallbackProvider<P, F> {
    fn name(&self) -> &str {
        self.primary.name()
    }

    fn dimension(&self) -> usize {
        self.primary.dimension()
    }

    fn embed(&self, attributes: &Value) -> Result<Vector> {
        match self.primary.embed(attributes) {
            Ok(vector) if vector.dim() == self.dimension() => Ok(vector),
            Ok(vector) => {
                warn!(
                    provider = self.primary.name(),
                    got = vector.dim(),
                    expected = self.dimension(),
                    "embedding has wrong dimension; using fallback"
                );
                self.fallback.embed(attributes)
            }
            Err(e) => {
                warn!(provider = self.primary.name(), error = %e, "embedding failed; using fallback");
                let vector = self.fallback.embed(attributes)?;
                debug!(provider = self.fallback.name(), "fallback embedding produced");
                Ok(vector)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Unavailable {
        calls: AtomicUsize,
    }

    impl EmbeddingProvider for Unavailable {
        fn name(&self) -> &str {
            "remote"
        }

        fn dimension(&self) -> usize {
            DEFAULT_HASH_DIM
        }

        fn embed(&self, _attributes: &Value) -> Result<Vector> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(Error::Embedding("service unavailable".to_string()))
        }
    }

    struct WrongDim;

    impl EmbeddingProvider for WrongDim {
        fn name(&self) -> &str {
            "short"
        }

        fn dimension(&self) -> usize {
            DEFAULT_HASH_DIM
        }

        fn embed(&self, _attributes: &Value) -> Result<Vector> {
            Ok(Vector::new(vec![1.0; 3]))
        }
    }

    fn activity() -> Value {
        json!({
            "name": "Balance beam circuit",
            "category": "motor",
            "difficulty": 2,
            "tags": ["balance", "coordination"]
        })
    }

    #[test]
    fn test_hash_embedding_is_deterministic_and_normalized() {
        let embedder = HashEmbedder::default();
        let a = embedder.embed(&activity()).unwrap();
        let b = embedder.embed(&activity()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.dim(), DEFAULT_HASH_DIM);
        assert!((a.norm() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_hash_embedding_reflects_attributes() {
        let embedder = HashEmbedder::new(256).unwrap();
        let base = embedder.embed(&activity()).unwrap();
        let close = embedder
            .embed(&json!({
                "name": "Balance beam walk",
                "category": "motor",
                "difficulty": 2,
                "tags": ["balance"]
            }))
            .unwrap();
        let far = embedder
            .embed(&json!({"name": "Picture naming cards", "category": "speech", "difficulty": 4}))
            .unwrap();
        assert!(base.cosine_similarity(&close, 0.0) > base.cosine_similarity(&far, 0.0));
    }

    #[test]
    fn test_integral_floats_embed_like_integers() {
        let embedder = HashEmbedder::default();
        let int = embedder.embed(&json!({"difficulty": 2, "level": -3})).unwrap();
        let float = embedder.embed(&json!({"difficulty": 2.0, "level": -3.0})).unwrap();
        assert_eq!(int, float);

        let fractional = embedder.embed(&json!({"difficulty": 2.5, "level": -3})).unwrap();
        assert_ne!(int, fractional);
    }

    #[test]
    fn test_empty_attributes_give_zero_vector() {
        let v = HashEmbedder::default().embed(&json!({})).unwrap();
        assert_eq!(v.norm(), 0.0);
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert!(HashEmbedder::new(0).is_err());
    }

    #[test]
    fn test_fallback_on_error() {
        let provider = FallbackProvider::new(
            Unavailable {
                calls: AtomicUsize::new(0),
            },
            HashEmbedder::default(),
        )
        .unwrap();
        let v = provider.embed(&activity()).unwrap();
        assert_eq!(v, HashEmbedder::default().embed(&activity()).unwrap());
        assert_eq!(provider.primary.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_fallback_on_wrong_dimension() {
        let provider = FallbackProvider::new(WrongDim, HashEmbedder::default()).unwrap();
        assert_eq!(provider.embed(&activity()).unwrap().dim(), DEFAULT_HASH_DIM);
    }

    #[test]
    fn test_fallback_dimension_must_agree() {
        let result = FallbackProvider::new(WrongDim, HashEmbedder::new(8).unwrap());
        assert!(matches!(result, Err(Error::Validation(ValidationError::InvalidConfig(_)))));
    }

    #[test]
    fn test_embed_profile() {
        let profile = embed_profile(&HashEmbedder::default(), "act-9", activity()).unwrap();
        assert_eq!(profile.owner_id, EntityId::from("act-9"));
        assert!(profile.generated_at.is_some());
        assert_eq!(profile.payload, Some(activity()));
    }

    #[test]
    fn test_embed_profile_checks_dimension() {
        assert!(matches!(
            embed_profile(&WrongDim, "x", activity()),
            Err(Error::Embedding(_))
        ));
    }
}
