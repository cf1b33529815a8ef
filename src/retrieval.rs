//! Query-time retrieval and context rendering.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use crate::embedding::Embedder;
use crate::error::RagResult;
use crate::store::CorpusStore;

/// Rendered retrieval output for one question.
///
/// Both lists are deduplicated by exact string equality, keeping the order
/// in which each string was first produced, which is descending score.
/// Distinct records that happen to render identically collapse into one
/// line; the same reference at two different percentages does not.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetrievedContext {
    /// One `[Title]: description 'reference'` line per distinct rendering.
    pub entries: Vec<String>,
    /// One `[NN.NN%] reference` line per distinct rendering.
    pub references: Vec<String>,
}

pub struct RetrievalEngine {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn CorpusStore>,
    top_k: usize,
}

impl RetrievalEngine {
    pub fn new(embedder: Arc<dyn Embedder>, store: Arc<dyn CorpusStore>, top_k: usize) -> Self {
        Self {
            embedder,
            store,
            top_k,
        }
    }

    /// Embeds the question and renders its top-k neighbors. An empty corpus
    /// yields empty lists, not an error.
    pub async fn retrieve(&self, query: &str) -> RagResult<RetrievedContext> {
        let vector = self.embedder.embed(query).await?;
        let hits = self.store.search(&vector, self.top_k).await?;
        debug!("Retrieved {} hits", hits.len());

        let mut context = RetrievedContext::default();
        let mut seen_entries = HashSet::new();
        let mut seen_references = HashSet::new();

        for hit in &hits {
            let entry = format!(
                "[{}]: {} '{}'",
                hit.movie.title, hit.movie.description, hit.movie.reference
            );
            if seen_entries.insert(entry.clone()) {
                context.entries.push(entry);
            }

            let reference = format!("[{:.2}%] {}", hit.score * 100.0, hit.movie.reference);
            if seen_references.insert(reference.clone()) {
                context.references.push(reference);
            }
        }

        Ok(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use uuid::Uuid;

    use crate::catalog::MovieRecord;
    use crate::store::SearchHit;

    struct FixedEmbedder;

    #[async_trait]
    impl Embedder for FixedEmbedder {
        async fn embed(&self, _text: &str) -> RagResult<Vec<f32>> {
            Ok(vec![1.0, 0.0])
        }

        fn dimension(&self) -> usize {
            2
        }
    }

    /// Replays a canned hit list regardless of the query vector.
    struct StubStore {
        hits: Vec<SearchHit>,
    }

    #[async_trait]
    impl CorpusStore for StubStore {
        async fn collection_exists(&self) -> RagResult<bool> {
            Ok(true)
        }

        async fn ensure_collection(&self, _dim: usize) -> RagResult<()> {
            Ok(())
        }

        async fn upsert(&self, _record: &MovieRecord, _vector: Vec<f32>) -> RagResult<()> {
            Ok(())
        }

        async fn search(&self, _vector: &[f32], k: usize) -> RagResult<Vec<SearchHit>> {
            Ok(self.hits.iter().take(k).cloned().collect())
        }

        async fn count(&self) -> RagResult<usize> {
            Ok(self.hits.len())
        }
    }

    fn hit(title: &str, reference: &str, score: f32) -> SearchHit {
        SearchHit {
            movie: MovieRecord {
                id: Uuid::new_v4(),
                title: title.to_string(),
                description: "desc".to_string(),
                reference: reference.to_string(),
            },
            score,
        }
    }

    fn engine(hits: Vec<SearchHit>, top_k: usize) -> RetrievalEngine {
        RetrievalEngine::new(Arc::new(FixedEmbedder), Arc::new(StubStore { hits }), top_k)
    }

    #[tokio::test]
    async fn test_duplicate_renderings_collapse_in_first_seen_order() -> RagResult<()> {
        // Two records rendering identically, then a distinct one.
        let hits = vec![
            hit("Twin", "https://a", 0.9),
            hit("Twin", "https://a", 0.9),
            hit("Other", "https://b", 0.5),
        ];
        let context = engine(hits, 10).retrieve("anything").await?;

        assert_eq!(
            context.entries,
            vec![
                "[Twin]: desc 'https://a'".to_string(),
                "[Other]: desc 'https://b'".to_string(),
            ]
        );
        assert_eq!(
            context.references,
            vec![
                "[90.00%] https://a".to_string(),
                "[50.00%] https://b".to_string(),
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_same_reference_with_different_scores_is_kept() -> RagResult<()> {
        let hits = vec![hit("One", "https://a", 0.9), hit("Two", "https://a", 0.5)];
        let context = engine(hits, 10).retrieve("anything").await?;
        assert_eq!(
            context.references,
            vec![
                "[90.00%] https://a".to_string(),
                "[50.00%] https://a".to_string(),
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_corpus_yields_empty_context() -> RagResult<()> {
        let context = engine(Vec::new(), 10).retrieve("anything").await?;
        assert!(context.entries.is_empty());
        assert!(context.references.is_empty());
        Ok(())
    }
}
