//! Request types for the Q&A pipeline
//!
//! Defines the conversation turn and the per-call generation request.

use serde::{Deserialize, Serialize};

/// One completed exchange in a conversation, oldest-first in a history.
///
/// A turn with a missing `ai_response` deserializes to an empty string and
/// renders as an empty `AI:` line in the prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// What the user asked
    pub user_query: String,
    /// What the assistant answered
    #[serde(default)]
    pub ai_response: String,
}

impl ConversationTurn {
    /// Create a new conversation turn
    pub fn new(user_query: &str, ai_response: &str) -> Self {
        Self {
            user_query: user_query.to_string(),
            ai_response: ai_response.to_string(),
        }
    }
}

/// Input for a single generation call.
///
/// Constructed per call and discarded after the response; the pipeline
/// keeps no conversation state between calls — the caller passes the full
/// history every time.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// The document to answer questions about
    pub document_text: String,
    /// The user's current question
    pub user_query: String,
    /// Prior turns, oldest first
    pub history: Vec<ConversationTurn>,
}

impl GenerationRequest {
    /// Create a new request with an empty history
    pub fn new(document_text: &str, user_query: &str) -> Self {
        Self {
            document_text: document_text.to_string(),
            user_query: user_query.to_string(),
            history: Vec::new(),
        }
    }

    /// Attach conversation history
    pub fn with_history(mut self, history: Vec<ConversationTurn>) -> Self {
        self.history = history;
        self
    }
}
