//! Cosine similarity between paired embeddings

use crate::{Error, Result};

/// Cosine similarity of two vectors, clamped to [-1, 1]
///
/// Accumulates in f64. A zero vector has similarity 0.0 with anything. A NaN
/// or infinite component is an [`Error::Embedding`].
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(Error::Embedding(format!(
            "Vectors must have same dimension ({} vs {})",
            a.len(),
            b.len()
        )));
    }

    if a.iter().chain(b).any(|x| !x.is_finite()) {
        return Err(Error::Embedding(
            "Embedding contains NaN or infinite values".to_string(),
        ));
    }

    let (mut dot, mut norm_a, mut norm_b) = (0.0f64, 0.0f64, 0.0f64);
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    // Rounding can push near-identical vectors slightly past 1.0
    Ok((dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0))
}

/// Cosine similarity of each `generated[i]` with `reference[i]`
pub fn pairwise_cosine_similarity(
    generated: &[Vec<f32>],
    reference: &[Vec<f32>],
) -> Result<Vec<f64>> {
    if generated.len() != reference.len() {
        return Err(Error::LengthMismatch {
            what: "reference embeddings",
            expected: generated.len(),
            found: reference.len(),
        });
    }

    generated
        .iter()
        .zip(reference)
        .map(|(g, r)| cosine_similarity(g, r))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity_identical() {
        let v = vec![1.0, 2.0, 3.0];
        assert!((cosine_similarity(&v, &v).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_cosine_similarity_opposite() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![-1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b).unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_cosine_similarity_orthogonal() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![0.0, 1.0, 0.0];
        assert!(cosine_similarity(&a, &b).unwrap().abs() < 1e-12);
    }

    #[test]
    fn test_cosine_similarity_zero_vector() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_cosine_similarity_dimension_mismatch() {
        let err = cosine_similarity(&[1.0], &[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, Error::Embedding(_)));
    }

    #[test]
    fn test_non_finite_components_are_rejected() {
        for bad in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            let err = cosine_similarity(&[1.0, bad], &[1.0, 0.0]).unwrap_err();
            assert!(matches!(err, Error::Embedding(_)));
            let err = cosine_similarity(&[0.0, 0.0], &[bad, 0.0]).unwrap_err();
            assert!(matches!(err, Error::Embedding(_)));
        }

        let err = pairwise_cosine_similarity(&[vec![1.0]], &[vec![f32::NAN]]).unwrap_err();
        assert!(matches!(err, Error::Embedding(_)));
    }

    #[test]
    fn test_scaled_copies_stay_in_bounds() {
        let base: Vec<f32> = (0..768).map(|i| ((i * 37 % 101) as f32 - 50.0) / 7.0).collect();
        for scale in [1e-3f32, 0.1, 1.0, 3.7, 1e3] {
            let scaled: Vec<f32> = base.iter().map(|x| x * scale).collect();
            let sim = cosine_similarity(&base, &scaled).unwrap();
            assert!(sim <= 1.0 && sim > 0.999_999);

            let flipped: Vec<f32> = scaled.iter().map(|x| -x).collect();
            let sim = cosine_similarity(&base, &flipped).unwrap();
            assert!(sim >= -1.0 && sim < -0.999_999);
        }
    }

    #[test]
    fn test_pairwise_alignment() {
        let generated = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        let reference = vec![vec![1.0, 0.0], vec![1.0, 0.0]];
        let scores = pairwise_cosine_similarity(&generated, &reference).unwrap();
        assert_eq!(scores.len(), 2);
        assert!((scores[0] - 1.0).abs() < 1e-12);
        assert!(scores[1].abs() < 1e-12);
    }

    #[test]
    fn test_pairwise_count_mismatch() {
        let err = pairwise_cosine_similarity(&[vec![1.0]], &[]).unwrap_err();
        assert!(matches!(err, Error::LengthMismatch { .. }));
    }
}
