//! One-time corpus ingestion.

use std::sync::Arc;

use tracing::{debug, info};

use crate::catalog::MovieRecord;
use crate::embedding::Embedder;
use crate::error::{RagError, RagResult};
use crate::store::CorpusStore;

/// Embeds and indexes the catalog unless the collection already exists.
pub struct IngestionManager {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn CorpusStore>,
}

impl IngestionManager {
    pub fn new(embedder: Arc<dyn Embedder>, store: Arc<dyn CorpusStore>) -> Self {
        Self { embedder, store }
    }

    /// Returns the number of records written: 0 when the collection was
    /// already there, the full catalog size otherwise.
    ///
    /// An existing collection counts as ingested even if a previous run
    /// died mid-ingest; partial state is not repaired.
    pub async fn ensure_ingested(&self, catalog: &[MovieRecord]) -> RagResult<usize> {
        if self.store.collection_exists().await? {
            debug!("Collection already present, skipping ingestion");
            return Ok(0);
        }

        info!("Ingesting {} movies", catalog.len());
        self.store
            .ensure_collection(self.embedder.dimension())
            .await?;

        for record in catalog {
            let vector = self
                .embedder
                .embed(&record.description)
                .await
                .map_err(|e| RagError::Ingestion(e.to_string()))?;
            self.store.upsert(record, vector).await?;
            debug!("Indexed '{}'", record.title);
        }

        Ok(catalog.len())
    }
}
