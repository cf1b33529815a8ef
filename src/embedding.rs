//! Text embedding backends.

use async_trait::async_trait;
use ollama_rs::generation::embeddings::request::{EmbeddingsInput, GenerateEmbeddingsRequest};
use ollama_rs::Ollama;

use crate::error::{RagError, RagResult};

/// Maps text to a fixed-dimension vector.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> RagResult<Vec<f32>>;

    /// Length of every vector this embedder produces.
    fn dimension(&self) -> usize;
}

/// Remote embeddings through an Ollama embedding model.
pub struct OllamaEmbedder {
    client: Ollama,
    model: String,
    dim: usize,
}

impl OllamaEmbedder {
    pub fn new(client: Ollama, model: impl Into<String>, dim: usize) -> Self {
        Self {
            client,
            model: model.into(),
            dim,
        }
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    async fn embed(&self, text: &str) -> RagResult<Vec<f32>> {
        let request = GenerateEmbeddingsRequest::new(
            self.model.clone(),
            EmbeddingsInput::Single(text.to_string()),
        );
        let response = self
            .client
            .generate_embeddings(request)
            .await
            .map_err(|e| RagError::Embedding(e.to_string()))?;

        let vector = response
            .embeddings
            .into_iter()
            .next()
            .ok_or_else(|| RagError::Embedding("model returned no vectors".to_string()))?;

        if vector.len() != self.dim {
            return Err(RagError::Embedding(format!(
                "dimension mismatch: expected {}, got {}",
                self.dim,
                vector.len()
            )));
        }
        Ok(vector)
    }

    fn dimension(&self) -> usize {
        self.dim
    }
}

/// Deterministic in-process embedder.
///
/// Hashes word stems into a fixed number of buckets and normalizes the
/// counts to unit length. No model quality, but stable across runs, which
/// is what offline mode and the test suite need.
pub struct HashEmbedder {
    dim: usize,
}

impl HashEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }

    fn fnv1a(token: &str) -> u64 {
        let mut hash: u64 = 0xcbf29ce484222325;
        for byte in token.bytes() {
            hash ^= byte as u64;
            hash = hash.wrapping_mul(0x100000001b3);
        }
        hash
    }

    /// Stems by truncation so close inflections share a bucket
    /// ("dreams" and "dreaming" both land on "dream").
    fn stem(token: &str) -> &str {
        let end = token
            .char_indices()
            .nth(5)
            .map_or(token.len(), |(idx, _)| idx);
        &token[..end]
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    async fn embed(&self, text: &str) -> RagResult<Vec<f32>> {
        let mut vector = vec![0.0f32; self.dim];
        for raw in text.split(|c: char| !c.is_alphanumeric()) {
            if raw.is_empty() {
                continue;
            }
            let token = raw.to_lowercase();
            let bucket = (Self::fnv1a(Self::stem(&token)) % self.dim as u64) as usize;
            vector[bucket] += 1.0;
        }
        normalize(&mut vector);
        Ok(vector)
    }

    fn dimension(&self) -> usize {
        self.dim
    }
}

/// Scales a vector to unit length. Zero vectors are left untouched.
pub fn normalize(vec: &mut [f32]) {
    let norm: f32 = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in vec {
            *x /= norm;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_embedder_is_deterministic() -> RagResult<()> {
        let embedder = HashEmbedder::new(384);
        let a = embedder.embed("a thief who steals secrets").await?;
        let b = embedder.embed("a thief who steals secrets").await?;
        assert_eq!(a, b);
        assert_eq!(a.len(), 384);
        Ok(())
    }

    #[tokio::test]
    async fn test_hash_embedder_outputs_unit_vectors() -> RagResult<()> {
        let embedder = HashEmbedder::new(384);
        let vector = embedder.embed("balloons over South America").await?;
        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
        Ok(())
    }

    #[tokio::test]
    async fn test_inflections_share_buckets() -> RagResult<()> {
        let embedder = HashEmbedder::new(384);
        assert_eq!(
            embedder.embed("dreams").await?,
            embedder.embed("dream").await?
        );
        assert_eq!(
            embedder.embed("Stealing").await?,
            embedder.embed("steals").await?
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_blank_text_embeds_to_zero_vector() -> RagResult<()> {
        let embedder = HashEmbedder::new(64);
        let vector = embedder.embed("   ").await?;
        assert!(vector.iter().all(|x| *x == 0.0));
        Ok(())
    }
}
