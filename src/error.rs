//! Pipeline error taxonomy.
//!
//! Every failure is attributed to the stage that raised it, so the console
//! loop can report the turn and keep running.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RagError {
    /// The embedding backend failed or returned a malformed vector.
    #[error("embedding error: {0}")]
    Embedding(String),

    /// The vector index failed a nearest-neighbor query or returned a
    /// hit that cannot be decoded.
    #[error("search error: {0}")]
    Search(String),

    /// Generation failed to start, or the response stream aborted
    /// before completion.
    #[error("generation error: {0}")]
    Generation(String),

    /// Corpus ingestion failed. The collection may be left partially
    /// populated.
    #[error("ingestion error: {0}")]
    Ingestion(String),
}

pub type RagResult<T> = Result<T, RagError>;
