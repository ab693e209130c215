//! Mock embedder for testing

use super::Embedder;
use crate::Result;

/// A mock embedder that generates deterministic embeddings based on text hash
///
/// Useful for testing and offline runs without an actual embedding model.
/// The embeddings are deterministic: same text → same embedding, so
/// identical generated/reference pairs score a similarity of 1.0.
pub struct MockEmbedder {
    dimension: usize,
}

impl MockEmbedder {
    /// Create a new mock embedder with the specified dimension
    pub fn new(dimension: usize) -> Self {
        MockEmbedder { dimension }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }
}

impl Default for MockEmbedder {
    fn default() -> Self {
        MockEmbedder::new(384)
    }
}

impl Embedder for MockEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        // Use BLAKE3 to generate deterministic pseudo-random values
        let mut current_hash = *blake3::hash(text.as_bytes()).as_bytes();
        let mut embedding = Vec::with_capacity(self.dimension);

        for i in 0..self.dimension {
            // Rehash when the 32 bytes are exhausted
            let byte_index = i % 32;
            if byte_index == 0 && i > 0 {
                current_hash = *blake3::hash(&current_hash).as_bytes();
            }

            // Convert byte to float in [-1, 1]
            let value = (current_hash[byte_index] as f32 / 127.5) - 1.0;
            embedding.push(value);
        }

        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut embedding {
                *v /= norm;
            }
        }

        Ok(embedding)
    }

    fn model_name(&self) -> &str {
        "mock-embedder"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_embedder_dimension() {
        let embedder = MockEmbedder::new(128);
        assert_eq!(embedder.embed("test").unwrap().len(), 128);
    }

    #[test]
    fn test_mock_embedder_deterministic() {
        let embedder = MockEmbedder::default();
        assert_eq!(
            embedder.embed("hello world").unwrap(),
            embedder.embed("hello world").unwrap()
        );
    }

    #[test]
    fn test_mock_embedder_different_texts() {
        let embedder = MockEmbedder::default();
        assert_ne!(embedder.embed("hello").unwrap(), embedder.embed("world").unwrap());
    }

    #[test]
    fn test_mock_embedder_batch_keeps_order() {
        let embedder = MockEmbedder::new(16);
        let batch = embedder.embed_batch(&["a", "b", "a"]).unwrap();

        assert_eq!(batch.len(), 3);
        assert_eq!(batch[0], batch[2]);
        assert_eq!(batch[1], embedder.embed("b").unwrap());
    }

    #[test]
    fn test_mock_embedder_normalized() {
        let embedding = MockEmbedder::default().embed("test").unwrap();
        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }
}
