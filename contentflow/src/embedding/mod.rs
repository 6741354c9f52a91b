//! Deterministic pseudo-embeddings.
//!
//! Vectors are drawn from a PRNG seeded with a SHA-256 digest of the text, so
//! identical text always maps to the identical vector regardless of call
//! order. The values carry no semantic meaning; they only give the fan-out
//! graph a stable, repeatable layout.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};

/// Default embedding dimensionality.
pub const DEFAULT_DIMENSION: usize = 64;

/// Produces fixed-size pseudo-embeddings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextEmbedder {
    dimension: usize,
}

impl Default for TextEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSION)
    }
}

impl TextEmbedder {
    /// Creates an embedder for the given dimension.
    #[must_use]
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    /// Returns the vector dimension.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Embeds `text`.
    #[must_use]
    pub fn embed(&self, text: &str) -> Vec<f32> {
        embed(text, self.dimension)
    }

    /// Cosine similarity between two embeddings.
    #[must_use]
    pub fn similarity(&self, a: &[f32], b: &[f32]) -> f32 {
        similarity(a, b)
    }
}

/// Derives the 32-bit PRNG seed for `text`.
#[must_use]
pub fn seed_for(text: &str) -> u32 {
    let digest = Sha256::digest(text.as_bytes());
    u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}

/// Returns `dim` uniform values in `[0, 1)` derived only from `text`.
#[must_use]
pub fn embed(text: &str, dim: usize) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(u64::from(seed_for(text)));
    (0..dim).map(|_| rng.gen::<f32>()).collect()
}

/// Cosine similarity in `[-1, 1]`.
///
/// Returns `0.0` when either vector has zero norm or the lengths differ.
#[must_use]
pub fn similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let cosine = dot / (norm_a * norm_b).sqrt();
    if cosine.is_finite() {
        #[allow(clippy::cast_possible_truncation)]
        let cosine = cosine.clamp(-1.0, 1.0) as f32;
        cosine
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embed_is_deterministic() {
        let a = embed("sustainable packaging", 32);
        let b = embed("sustainable packaging", 32);
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
    }

    #[test]
    fn test_embed_ignores_call_order() {
        let first = embed("alpha", 16);
        let _ = embed("beta", 16);
        let _ = embed("gamma", 16);
        assert_eq!(embed("alpha", 16), first);
    }

    #[test]
    fn test_distinct_texts_differ() {
        let a = embed("what is tracing", 16);
        let b = embed("what is tracing?", 16);
        assert_ne!(a, b);
    }

    #[test]
    fn test_values_in_unit_interval() {
        let v = embed("range check", 256);
        assert!(v.iter().all(|x| (0.0..1.0).contains(x)));
    }

    #[test]
    fn test_self_similarity_is_one() {
        let v = embed("identity", 64);
        let sim = similarity(&v, &v);
        assert!((sim - 1.0).abs() < 1e-6, "got {sim}");
    }

    #[test]
    fn test_zero_vector_similarity() {
        let zero = vec![0.0; 8];
        let other = embed("anything", 8);
        assert_eq!(similarity(&zero, &other), 0.0);
        assert_eq!(similarity(&other, &zero), 0.0);
    }

    #[test]
    fn test_similarity_bounds() {
        let a = [1.0, 0.0];
        let b = [-1.0, 0.0];
        assert!((similarity(&a, &b) + 1.0).abs() < 1e-6);
        assert_eq!(similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
        assert_eq!(similarity(&[1.0], &[1.0, 2.0]), 0.0);
    }

    #[test]
    fn test_embedder_uses_dimension() {
        let embedder = TextEmbedder::new(12);
        assert_eq!(embedder.embed("x").len(), 12);
        assert_eq!(TextEmbedder::default().dimension(), DEFAULT_DIMENSION);
    }
}
