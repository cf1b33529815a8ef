//! Turn driver for an interactive session.

use std::sync::Arc;

use futures_util::StreamExt;
use tracing::debug;

use crate::conversation::ConversationMemory;
use crate::error::RagResult;
use crate::prompt;
use crate::provider::LLMProvider;
use crate::retrieval::RetrievalEngine;

/// One completed turn: the full answer text plus the references that
/// backed it.
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    /// Exact concatenation of the streamed fragments.
    pub text: String,
    pub references: Vec<String>,
}

/// Console input, classified.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    Quit,
    Blank,
    Ask(String),
}

impl ReplCommand {
    /// `quit` in any casing ends the session; blank input re-prompts.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            ReplCommand::Blank
        } else if trimmed.eq_ignore_ascii_case("quit") {
            ReplCommand::Quit
        } else {
            ReplCommand::Ask(trimmed.to_string())
        }
    }
}

/// Owns the conversation memory and drives retrieve, prompt, generate,
/// record for each question.
pub struct ChatSession {
    retriever: RetrievalEngine,
    provider: Arc<dyn LLMProvider>,
    memory: ConversationMemory,
    chat_model: String,
}

impl ChatSession {
    pub fn new(
        retriever: RetrievalEngine,
        provider: Arc<dyn LLMProvider>,
        chat_model: impl Into<String>,
    ) -> Self {
        Self {
            retriever,
            provider,
            memory: ConversationMemory::new(),
            chat_model: chat_model.into(),
        }
    }

    /// Read-only view of the conversation so far.
    pub fn memory(&self) -> &ConversationMemory {
        &self.memory
    }

    /// Runs one full turn. `on_token` sees every response fragment in
    /// arrival order; the returned answer text is their concatenation.
    ///
    /// A whitespace-only question is a no-op returning `None` without
    /// touching any backend. The question is recorded before generation
    /// starts, so a turn that fails mid-stream leaves the question in
    /// memory with no answer half.
    pub async fn ask<F>(&mut self, query: &str, mut on_token: F) -> RagResult<Option<Answer>>
    where
        F: FnMut(&str) + Send,
    {
        let query = query.trim();
        if query.is_empty() {
            return Ok(None);
        }

        let retrieved = self.retriever.retrieve(query).await?;

        // The prompt sees only turns recorded before this one.
        let request = prompt::build_request(&retrieved.entries, self.memory.messages(), query);
        self.memory.add_message(query);

        let mut stream = self
            .provider
            .generate_stream(&self.chat_model, request.prompt, Some(request.system))
            .await?;

        let mut text = String::new();
        while let Some(fragment) = stream.next().await {
            let fragment = fragment?;
            on_token(&fragment);
            text.push_str(&fragment);
        }

        self.memory.add_message(&text);
        debug!("Turn complete, {} messages in memory", self.memory.len());

        Ok(Some(Answer {
            text,
            references: retrieved.references,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quit_parses_in_any_casing() {
        assert_eq!(ReplCommand::parse("quit"), ReplCommand::Quit);
        assert_eq!(ReplCommand::parse("QUIT"), ReplCommand::Quit);
        assert_eq!(ReplCommand::parse("  Quit  "), ReplCommand::Quit);
    }

    #[test]
    fn test_blank_input_is_not_a_question() {
        assert_eq!(ReplCommand::parse(""), ReplCommand::Blank);
        assert_eq!(ReplCommand::parse("   \t"), ReplCommand::Blank);
    }

    #[test]
    fn test_anything_else_is_a_question() {
        assert_eq!(
            ReplCommand::parse(" who directed Up? \n"),
            ReplCommand::Ask("who directed Up?".to_string())
        );
        // Only the bare word quits.
        assert_eq!(
            ReplCommand::parse("quit please"),
            ReplCommand::Ask("quit please".to_string())
        );
    }
}
