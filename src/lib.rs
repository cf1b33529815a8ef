//! Retrieval-augmented movie Q&A.
//!
//! Each question is embedded and matched against a vector index of movie
//! descriptions. The hits and the running conversation history are folded
//! into a fixed prompt template, the answer is streamed back fragment by
//! fragment, and both halves of the turn are recorded into memory.

pub mod catalog;
pub mod config;
pub mod conversation;
pub mod embedding;
pub mod error;
pub mod ingest;
pub mod prompt;
pub mod provider;
pub mod retrieval;
pub mod session;
pub mod store;

// Re-exports for convenience
pub use catalog::{builtin_catalog, MovieRecord};
pub use config::AppConfig;
pub use error::{RagError, RagResult};
pub use session::{Answer, ChatSession, ReplCommand};
