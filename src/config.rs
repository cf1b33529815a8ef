//! Runtime configuration.
//!
//! Every knob is an environment variable with a default matching the stock
//! local deployment, so the binary runs with no configuration at all.

use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Ollama host including scheme.
    pub ollama_host: String,
    pub ollama_port: u16,
    /// Qdrant gRPC endpoint.
    pub qdrant_url: String,
    /// Model used for answer generation.
    pub chat_model: String,
    /// Model used for embeddings. `vector_dim` must match what it produces.
    pub embedding_model: String,
    /// Vector collection holding the movie corpus.
    pub collection: String,
    /// Nearest neighbors retrieved per question.
    pub top_k: usize,
    pub vector_dim: usize,
    /// Swaps Qdrant and the Ollama embedder for the in-process store and
    /// hash embedder. Generation still goes through Ollama.
    pub offline: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            ollama_host: env::var("CINERAG_OLLAMA_HOST")
                .unwrap_or_else(|_| "http://localhost".to_string()),
            ollama_port: env::var("CINERAG_OLLAMA_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(11434),
            qdrant_url: env::var("CINERAG_QDRANT_URL")
                .unwrap_or_else(|_| "http://localhost:6334".to_string()),
            chat_model: env::var("CINERAG_CHAT_MODEL")
                .unwrap_or_else(|_| "gemma3:12b".to_string()),
            embedding_model: env::var("CINERAG_EMBEDDING_MODEL")
                .unwrap_or_else(|_| "nomic-embed-text".to_string()),
            collection: env::var("CINERAG_COLLECTION").unwrap_or_else(|_| "movies".to_string()),
            top_k: env::var("CINERAG_TOP_K")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            vector_dim: env::var("CINERAG_VECTOR_DIM")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(768),
            offline: env::var("CINERAG_OFFLINE").unwrap_or_else(|_| "0".to_string()) == "1",
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ollama_host: "http://localhost".to_string(),
            ollama_port: 11434,
            qdrant_url: "http://localhost:6334".to_string(),
            chat_model: "gemma3:12b".to_string(),
            embedding_model: "nomic-embed-text".to_string(),
            collection: "movies".to_string(),
            top_k: 10,
            vector_dim: 768,
            offline: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_stock_deployment() {
        let config = AppConfig::default();
        assert_eq!(config.ollama_port, 11434);
        assert_eq!(config.qdrant_url, "http://localhost:6334");
        assert_eq!(config.collection, "movies");
        assert_eq!(config.top_k, 10);
        assert!(!config.offline);
    }
}
