//! Corpus index backends.
//!
//! The write path runs once at startup; afterwards the index only serves
//! nearest-neighbor reads.

use async_trait::async_trait;
use qdrant_client::qdrant::point_id::PointIdOptions;
use qdrant_client::qdrant::value::Kind;
use qdrant_client::qdrant::{
    CountPointsBuilder, CreateCollectionBuilder, Distance, PointStruct, ScoredPoint,
    SearchPointsBuilder, UpsertPointsBuilder, VectorParamsBuilder,
};
use qdrant_client::{Payload, Qdrant};
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::catalog::MovieRecord;
use crate::config::AppConfig;
use crate::error::{RagError, RagResult};

/// A single nearest-neighbor hit. Ephemeral, never stored.
///
/// The score is whatever the backend reports for its distance metric; only
/// its ordering and the percentage rendering are relied on.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub movie: MovieRecord,
    pub score: f32,
}

#[async_trait]
pub trait CorpusStore: Send + Sync {
    async fn collection_exists(&self) -> RagResult<bool>;
    async fn ensure_collection(&self, dim: usize) -> RagResult<()>;
    /// Inserts or replaces the record keyed by its id.
    async fn upsert(&self, record: &MovieRecord, vector: Vec<f32>) -> RagResult<()>;
    /// Top-k nearest neighbors, descending score.
    async fn search(&self, vector: &[f32], k: usize) -> RagResult<Vec<SearchHit>>;
    async fn count(&self) -> RagResult<usize>;
}

pub enum MovieStore {
    Local(LocalMovieStore),
    Qdrant(QdrantMovieStore),
}

impl MovieStore {
    /// Picks the backend from configuration: the in-process store when
    /// offline, Qdrant otherwise.
    pub fn connect(config: &AppConfig) -> RagResult<Self> {
        if config.offline {
            info!("Using in-process movie store");
            Ok(MovieStore::Local(LocalMovieStore::new()))
        } else {
            info!("Connecting to Qdrant at {}", config.qdrant_url);
            Ok(MovieStore::Qdrant(QdrantMovieStore::connect(
                &config.qdrant_url,
                &config.collection,
            )?))
        }
    }
}

#[async_trait]
impl CorpusStore for MovieStore {
    async fn collection_exists(&self) -> RagResult<bool> {
        match self {
            Self::Local(s) => s.collection_exists().await,
            Self::Qdrant(s) => s.collection_exists().await,
        }
    }

    async fn ensure_collection(&self, dim: usize) -> RagResult<()> {
        match self {
            Self::Local(s) => s.ensure_collection(dim).await,
            Self::Qdrant(s) => s.ensure_collection(dim).await,
        }
    }

    async fn upsert(&self, record: &MovieRecord, vector: Vec<f32>) -> RagResult<()> {
        match self {
            Self::Local(s) => s.upsert(record, vector).await,
            Self::Qdrant(s) => s.upsert(record, vector).await,
        }
    }

    async fn search(&self, vector: &[f32], k: usize) -> RagResult<Vec<SearchHit>> {
        match self {
            Self::Local(s) => s.search(vector, k).await,
            Self::Qdrant(s) => s.search(vector, k).await,
        }
    }

    async fn count(&self) -> RagResult<usize> {
        match self {
            Self::Local(s) => s.count().await,
            Self::Qdrant(s) => s.count().await,
        }
    }
}

/// In-RAM store with brute-force cosine scoring.
pub struct LocalMovieStore {
    dim: RwLock<Option<usize>>,
    entries: RwLock<Vec<(MovieRecord, Vec<f32>)>>,
}

impl LocalMovieStore {
    pub fn new() -> Self {
        Self {
            dim: RwLock::new(None),
            entries: RwLock::new(Vec::new()),
        }
    }

    fn cosine(a: &[f32], b: &[f32]) -> f32 {
        let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm_a > 0.0 && norm_b > 0.0 {
            dot / (norm_a * norm_b)
        } else {
            0.0
        }
    }
}

impl Default for LocalMovieStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CorpusStore for LocalMovieStore {
    async fn collection_exists(&self) -> RagResult<bool> {
        Ok(self.dim.read().await.is_some())
    }

    async fn ensure_collection(&self, dim: usize) -> RagResult<()> {
        let mut current = self.dim.write().await;
        if current.is_none() {
            *current = Some(dim);
        }
        Ok(())
    }

    async fn upsert(&self, record: &MovieRecord, vector: Vec<f32>) -> RagResult<()> {
        match *self.dim.read().await {
            Some(dim) if dim == vector.len() => {}
            Some(dim) => {
                return Err(RagError::Ingestion(format!(
                    "vector length {} does not match collection dimension {}",
                    vector.len(),
                    dim
                )))
            }
            None => return Err(RagError::Ingestion("collection not created".to_string())),
        }

        let mut entries = self.entries.write().await;
        entries.retain(|(existing, _)| existing.id != record.id);
        entries.push((record.clone(), vector));
        Ok(())
    }

    async fn search(&self, vector: &[f32], k: usize) -> RagResult<Vec<SearchHit>> {
        let entries = self.entries.read().await;
        let mut hits: Vec<SearchHit> = entries
            .iter()
            .map(|(record, stored)| SearchHit {
                movie: record.clone(),
                score: Self::cosine(vector, stored),
            })
            .collect();

        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hits.truncate(k);
        Ok(hits)
    }

    async fn count(&self) -> RagResult<usize> {
        Ok(self.entries.read().await.len())
    }
}

/// Qdrant-backed store. Movie fields travel in the point payload.
pub struct QdrantMovieStore {
    client: Qdrant,
    collection: String,
}

impl QdrantMovieStore {
    pub fn connect(url: &str, collection: &str) -> RagResult<Self> {
        let client = Qdrant::from_url(url)
            .build()
            .map_err(|e| RagError::Ingestion(e.to_string()))?;
        Ok(Self {
            client,
            collection: collection.to_string(),
        })
    }

    fn payload_str(point: &ScoredPoint, key: &str) -> RagResult<String> {
        match point.payload.get(key).and_then(|value| value.kind.as_ref()) {
            Some(Kind::StringValue(s)) => Ok(s.clone()),
            _ => Err(RagError::Search(format!(
                "search hit is missing the '{}' payload field",
                key
            ))),
        }
    }
}

#[async_trait]
impl CorpusStore for QdrantMovieStore {
    async fn collection_exists(&self) -> RagResult<bool> {
        self.client
            .collection_exists(&self.collection)
            .await
            .map_err(|e| RagError::Ingestion(e.to_string()))
    }

    async fn ensure_collection(&self, dim: usize) -> RagResult<()> {
        if self.collection_exists().await? {
            return Ok(());
        }
        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection)
                    .vectors_config(VectorParamsBuilder::new(dim as u64, Distance::Cosine)),
            )
            .await
            .map_err(|e| RagError::Ingestion(e.to_string()))?;
        Ok(())
    }

    async fn upsert(&self, record: &MovieRecord, vector: Vec<f32>) -> RagResult<()> {
        let payload = Payload::try_from(serde_json::json!({
            "title": record.title,
            "description": record.description,
            "reference": record.reference,
        }))
        .map_err(|e| RagError::Ingestion(e.to_string()))?;

        let point = PointStruct::new(record.id.to_string(), vector, payload);
        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, vec![point]).wait(true))
            .await
            .map_err(|e| RagError::Ingestion(e.to_string()))?;
        Ok(())
    }

    async fn search(&self, vector: &[f32], k: usize) -> RagResult<Vec<SearchHit>> {
        let response = self
            .client
            .search_points(
                SearchPointsBuilder::new(&self.collection, vector.to_vec(), k as u64)
                    .with_payload(true),
            )
            .await
            .map_err(|e| RagError::Search(e.to_string()))?;

        let mut hits = Vec::with_capacity(response.result.len());
        for point in response.result {
            let id = point
                .id
                .as_ref()
                .and_then(|id| match id.point_id_options {
                    Some(PointIdOptions::Uuid(ref s)) => Uuid::parse_str(s).ok(),
                    _ => None,
                })
                .ok_or_else(|| RagError::Search("search hit has no usable point id".to_string()))?;

            let movie = MovieRecord {
                id,
                title: Self::payload_str(&point, "title")?,
                description: Self::payload_str(&point, "description")?,
                reference: Self::payload_str(&point, "reference")?,
            };
            hits.push(SearchHit {
                movie,
                score: point.score,
            });
        }
        Ok(hits)
    }

    async fn count(&self) -> RagResult<usize> {
        let response = self
            .client
            .count(CountPointsBuilder::new(&self.collection).exact(true))
            .await
            .map_err(|e| RagError::Ingestion(e.to_string()))?;
        Ok(response.result.map_or(0, |r| r.count as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str) -> MovieRecord {
        MovieRecord::new(title, "description", "https://example.com")
    }

    #[tokio::test]
    async fn test_collection_exists_flips_after_create() -> RagResult<()> {
        let store = LocalMovieStore::new();
        assert!(!store.collection_exists().await?);
        store.ensure_collection(3).await?;
        assert!(store.collection_exists().await?);
        Ok(())
    }

    #[tokio::test]
    async fn test_upsert_replaces_by_id() -> RagResult<()> {
        let store = LocalMovieStore::new();
        store.ensure_collection(3).await?;

        let movie = record("Solaris");
        store.upsert(&movie, vec![1.0, 0.0, 0.0]).await?;
        store.upsert(&movie, vec![0.0, 1.0, 0.0]).await?;
        assert_eq!(store.count().await?, 1);

        let hits = store.search(&[0.0, 1.0, 0.0], 5).await?;
        assert_eq!(hits.len(), 1);
        assert!(hits[0].score > 0.99);
        Ok(())
    }

    #[tokio::test]
    async fn test_search_orders_by_descending_score() -> RagResult<()> {
        let store = LocalMovieStore::new();
        store.ensure_collection(2).await?;
        store.upsert(&record("Far"), vec![0.0, 1.0]).await?;
        store.upsert(&record("Near"), vec![1.0, 0.0]).await?;
        store.upsert(&record("Mid"), vec![1.0, 1.0]).await?;

        let hits = store.search(&[1.0, 0.0], 10).await?;
        let titles: Vec<&str> = hits.iter().map(|h| h.movie.title.as_str()).collect();
        assert_eq!(titles, vec!["Near", "Mid", "Far"]);
        assert!(hits[0].score >= hits[1].score && hits[1].score >= hits[2].score);
        Ok(())
    }

    #[tokio::test]
    async fn test_search_truncates_to_k() -> RagResult<()> {
        let store = LocalMovieStore::new();
        store.ensure_collection(2).await?;
        for i in 0..8 {
            store
                .upsert(&record(&format!("Movie {}", i)), vec![1.0, i as f32])
                .await?;
        }
        assert_eq!(store.search(&[1.0, 0.0], 3).await?.len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_upsert_enforces_dimension() {
        let store = LocalMovieStore::new();
        assert!(matches!(
            store.upsert(&record("Early"), vec![1.0]).await,
            Err(RagError::Ingestion(_))
        ));

        store.ensure_collection(2).await.unwrap();
        assert!(matches!(
            store.upsert(&record("Short"), vec![1.0]).await,
            Err(RagError::Ingestion(_))
        ));
    }
}
