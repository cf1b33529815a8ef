//! Interactive movie Q&A console.
//!
//! Wires the embedding, index and generation backends together, ingests
//! the built-in catalog on first run, then drives the question loop.

use anyhow::Result;
use ollama_rs::Ollama;
use std::io::{self, Write};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cinerag::catalog::builtin_catalog;
use cinerag::config::AppConfig;
use cinerag::embedding::{Embedder, HashEmbedder, OllamaEmbedder};
use cinerag::ingest::IngestionManager;
use cinerag::provider::{LLMProvider, OllamaProvider};
use cinerag::retrieval::RetrievalEngine;
use cinerag::session::{ChatSession, ReplCommand};
use cinerag::store::{CorpusStore, MovieStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize logging; user-facing output stays on plain stdout
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    let config = AppConfig::from_env();

    println!("\n{}", "═".repeat(60));
    println!("🎬 CineRAG Movie Q&A v0.1.0");
    println!("{}\n", "═".repeat(60));

    let ollama = Ollama::new(config.ollama_host.clone(), config.ollama_port);

    let embedder: Arc<dyn Embedder> = if config.offline {
        info!("Offline mode: hash embeddings, in-process index");
        Arc::new(HashEmbedder::new(config.vector_dim))
    } else {
        Arc::new(OllamaEmbedder::new(
            ollama.clone(),
            &config.embedding_model,
            config.vector_dim,
        ))
    };

    let store: Arc<dyn CorpusStore> = Arc::new(MovieStore::connect(&config)?);
    let provider: Arc<dyn LLMProvider> = Arc::new(OllamaProvider::new(ollama));

    // One-time ingestion; a failure here is fatal, per-turn failures are not
    let ingestor = IngestionManager::new(embedder.clone(), store.clone());
    let written = ingestor.ensure_ingested(&builtin_catalog()).await?;
    if written > 0 {
        println!("📚 Indexed {} movies", written);
    }
    info!("Corpus ready with {} movies", store.count().await?);

    let retriever = RetrievalEngine::new(embedder, store, config.top_k);
    let mut session = ChatSession::new(retriever, provider, &config.chat_model);

    println!("Movie Database Ready! Ask questions about movies or type 'quit' to exit.");

    loop {
        print!("\nYour question: ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            // stdin closed
            break;
        }

        match ReplCommand::parse(&input) {
            ReplCommand::Blank => continue,
            ReplCommand::Quit => {
                println!("Goodbye!");
                break;
            }
            ReplCommand::Ask(query) => {
                let outcome = session
                    .ask(&query, |fragment| {
                        print!("{}", fragment);
                        let _ = io::stdout().flush();
                    })
                    .await;

                match outcome {
                    Ok(Some(answer)) => {
                        if !answer.references.is_empty() {
                            println!("\n\nReferences used:");
                            for reference in &answer.references {
                                println!("- {}", reference);
                            }
                        }
                        println!("\n");
                    }
                    Ok(None) => {}
                    Err(e) => println!("\n❌ Error: {}", e),
                }
            }
        }
    }

    Ok(())
}
