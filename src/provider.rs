//! Chat generation backends.
//!
//! Answers are consumed as a stream of response fragments so the console
//! can surface text while the model is still generating.

use std::pin::Pin;

use async_trait::async_trait;
use futures_util::{Stream, StreamExt};
use ollama_rs::generation::chat::{request::ChatMessageRequest, ChatMessage};
use ollama_rs::Ollama;

use crate::error::{RagError, RagResult};

/// Finite, forward-only stream of response fragments. An `Err` item means
/// the stream aborted mid-generation; no further items follow it.
pub type TokenStream = Pin<Box<dyn Stream<Item = RagResult<String>> + Send>>;

#[async_trait]
pub trait LLMProvider: Send + Sync {
    async fn generate_stream(
        &self,
        model: &str,
        prompt: String,
        system: Option<String>,
    ) -> RagResult<TokenStream>;
}

pub struct OllamaProvider {
    client: Ollama,
}

impl OllamaProvider {
    pub fn new(client: Ollama) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LLMProvider for OllamaProvider {
    async fn generate_stream(
        &self,
        model: &str,
        prompt: String,
        system: Option<String>,
    ) -> RagResult<TokenStream> {
        let mut messages = Vec::new();
        if let Some(sys) = system {
            messages.push(ChatMessage::system(sys));
        }
        messages.push(ChatMessage::user(prompt));

        let stream = self
            .client
            .send_chat_messages_stream(ChatMessageRequest::new(model.to_string(), messages))
            .await
            .map_err(|e| RagError::Generation(e.to_string()))?;

        let fragments = stream.map(|res| {
            res.map(|chunk| chunk.message.content)
                .map_err(|_| RagError::Generation("response stream interrupted".to_string()))
        });

        Ok(Box::pin(fragments))
    }
}
