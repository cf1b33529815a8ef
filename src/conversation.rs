//! Conversation memory.
//!
//! A session-owned, append-only list of turn halves in chronological
//! order. Grows without bound for the life of the process.

/// Chronological history for one session: question, answer, question,
/// answer. A turn whose generation failed leaves only its question half.
#[derive(Debug, Clone, Default)]
pub struct ConversationMemory {
    messages: Vec<String>,
}

impl ConversationMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one turn half, trimmed of surrounding whitespace.
    pub fn add_message(&mut self, text: &str) {
        self.messages.push(text.trim().to_string());
    }

    /// Full history, oldest first.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
