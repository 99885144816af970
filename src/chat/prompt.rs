//! Prompt construction for document Q&A
//!
//! Assembles the document, conversation history, and current query into
//! the single instruction string submitted to the model.

use super::request::ConversationTurn;

/// Fixed instruction header establishing the assistant's role and answer policy.
const INSTRUCTION_HEADER: &str = "You are an intelligent assistant for document analysis. \
    Based on the provided document and the ongoing conversation, answer the user's query \
    concisely and accurately. If the answer cannot be found in the document, state that clearly.";

/// Builds prompts from a document, a query, and prior turns.
///
/// Rendering is a pure function of its inputs: no I/O, no truncation
/// (length budgeting happens later, on the tokenized form).
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    /// Create a new prompt builder
    pub fn new() -> Self {
        Self
    }

    /// Render the full prompt.
    ///
    /// Sections appear in fixed order: instruction header, document,
    /// conversation history, current query, and the trailing cue marking
    /// where the assistant's answer begins. An empty history renders an
    /// empty history block with no `Previous conversation:` line.
    pub fn render(
        &self,
        document_text: &str,
        user_query: &str,
        history: &[ConversationTurn],
    ) -> String {
        let mut history_block = String::new();
        if !history.is_empty() {
            history_block.push_str("Previous conversation:\n");
            for turn in history {
                history_block.push_str(&format!(
                    "User: {}\nAI: {}\n",
                    turn.user_query, turn.ai_response
                ));
            }
            history_block.push('\n');
        }

        format!(
            "{INSTRUCTION_HEADER}\n\n\
             --- Document ---\n{document_text}\n\n\
             --- Conversation History ---\n{history_block}\
             --- Current User Query ---\n{user_query}\n\n\
             --- Assistant's Response ---"
        )
    }
}
