//! Inference engine for document Q&A
//!
//! Owns the loaded model, enforces the input-token budget against the
//! rendered prompt, and classifies failures. Invoked synchronously, once
//! per request; the model handle serializes inference internally.

use std::time::Instant;

use crate::model::ModelHandle;

use super::config::{EngineConfig, GenerationConfig};
use super::error::ChatError;
use super::prompt::PromptBuilder;
use super::request::GenerationRequest;

/// Tokens reserved below the model's maximum context length for the
/// generation budget.
pub const INPUT_TOKEN_HEADROOM: usize = 100;

/// Orchestrates prompt rendering, tokenization, truncation, and generation.
///
/// Holds the model in one of two states: available (loaded at startup) or
/// unavailable (load failed or never attempted). The transition is one-way
/// and happens once, in [`InferenceEngine::load`]; there is no reload
/// without a process restart.
pub struct InferenceEngine {
    model: Option<ModelHandle>,
    prompt_builder: PromptBuilder,
    generation: GenerationConfig,
    max_history_turns: usize,
}

impl InferenceEngine {
    /// Create an engine around an already-loaded (or absent) model.
    pub fn new(
        model: Option<ModelHandle>,
        config: &EngineConfig,
        generation: GenerationConfig,
    ) -> Self {
        Self {
            model,
            prompt_builder: PromptBuilder::new(),
            generation,
            max_history_turns: config.max_history_turns,
        }
    }

    /// Attempt to load the model once and build the engine.
    ///
    /// A load failure is logged and leaves the engine unavailable rather
    /// than aborting the process: every subsequent call then fails with
    /// [`ChatError::NotReady`].
    pub fn load(config: &EngineConfig, generation: GenerationConfig) -> Self {
        let model = match ModelHandle::load(config) {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::error!("Error loading model '{}': {e:#}", config.model_id);
                None
            }
        };
        Self::new(model, config, generation)
    }

    /// Whether the model loaded successfully.
    pub fn is_ready(&self) -> bool {
        self.model.is_some()
    }

    /// Generate an answer for the request.
    ///
    /// Renders the prompt, tokenizes it, right-truncates to the input
    /// budget (`model_max_length - 100` tokens), and runs one sampled
    /// generation. Only the newly generated span is decoded and returned.
    ///
    /// With a very long document the right-truncation can drop the query
    /// and trailing cue from the prompt; that is the accepted limitation
    /// of fixed-budget prompting, not silently compensated for here.
    pub fn generate(&self, request: &GenerationRequest) -> Result<String, ChatError> {
        let model = self.model.as_ref().ok_or(ChatError::NotReady)?;

        if request.document_text.trim().is_empty() {
            return Err(ChatError::EmptyInput("document_text"));
        }
        if request.user_query.trim().is_empty() {
            return Err(ChatError::EmptyInput("user_query"));
        }

        // Window long histories so they cannot crowd the document out of
        // the token budget; the turns kept stay in original order.
        let history = trailing_window(&request.history, self.max_history_turns);

        let prompt = self
            .prompt_builder
            .render(&request.document_text, &request.user_query, history);

        let tokens = model
            .tokenizer()
            .encode(&prompt, true)
            .map_err(ChatError::Inference)?;

        let budget = model
            .tokenizer()
            .model_max_length()
            .saturating_sub(INPUT_TOKEN_HEADROOM)
            .max(1);
        let tokens = truncate_input(tokens, budget);

        tracing::info!("Starting inference ({} prompt tokens)", tokens.len());
        let start = Instant::now();
        let answer = model
            .generate(&tokens, &self.generation)
            .map_err(ChatError::Inference)?;
        tracing::info!(
            "Inference completed in {}ms",
            start.elapsed().as_millis()
        );

        Ok(answer)
    }
}

/// Keep the most recent `max_turns` items, preserving order.
fn trailing_window<T>(items: &[T], max_turns: usize) -> &[T] {
    let start = items.len().saturating_sub(max_turns);
    &items[start..]
}

/// Right-truncate a token sequence to at most `budget` tokens.
fn truncate_input(mut tokens: Vec<u32>, budget: usize) -> Vec<u32> {
    if tokens.len() > budget {
        tracing::warn!(
            "Prompt truncated from {} to {} input tokens",
            tokens.len(),
            budget
        );
        tokens.truncate(budget);
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::request::ConversationTurn;

    fn unavailable_engine() -> InferenceEngine {
        InferenceEngine::new(None, &EngineConfig::default(), GenerationConfig::default())
    }

    #[test]
    fn test_not_ready_without_model() {
        let engine = unavailable_engine();
        let request = GenerationRequest::new("some document", "some query");

        let err = engine.generate(&request).unwrap_err();
        assert!(matches!(err, ChatError::NotReady));
    }

    #[test]
    fn test_not_ready_for_every_call() {
        let engine = unavailable_engine();
        let request = GenerationRequest::new("doc", "query");

        for _ in 0..5 {
            assert!(matches!(
                engine.generate(&request),
                Err(ChatError::NotReady)
            ));
        }
    }

    #[test]
    fn test_not_ready_reported() {
        let engine = unavailable_engine();
        assert!(!engine.is_ready());
    }

    #[test]
    fn test_truncate_input_respects_budget() {
        let tokens: Vec<u32> = (0..1000).collect();
        let truncated = truncate_input(tokens, 412);

        assert_eq!(truncated.len(), 412);
        // Right-truncation keeps the front of the sequence
        assert_eq!(truncated[0], 0);
        assert_eq!(truncated[411], 411);
    }

    #[test]
    fn test_truncate_input_short_sequence_untouched() {
        let tokens: Vec<u32> = (0..10).collect();
        let truncated = truncate_input(tokens.clone(), 412);
        assert_eq!(truncated, tokens);
    }

    #[test]
    fn test_trailing_window_keeps_most_recent() {
        let turns: Vec<ConversationTurn> = (0..30)
            .map(|i| ConversationTurn::new(&format!("q{i}"), &format!("a{i}")))
            .collect();

        let window = trailing_window(&turns, 20);
        assert_eq!(window.len(), 20);
        assert_eq!(window[0].user_query, "q10");
        assert_eq!(window[19].user_query, "q29");
    }

    #[test]
    fn test_trailing_window_shorter_than_limit() {
        let turns = vec![ConversationTurn::new("q", "a")];
        assert_eq!(trailing_window(&turns, 20).len(), 1);
    }

    #[test]
    #[ignore] // requires model download; run with --ignored
    fn test_end_to_end_generation() {
        use crate::model::DevicePreference;

        let config = EngineConfig::new("google/flan-t5-small")
            .with_device(DevicePreference::Cpu)
            .with_dtype("f32");
        let engine = InferenceEngine::load(&config, GenerationConfig::default());
        assert!(engine.is_ready());

        let request = GenerationRequest::new(
            "Dropout is a regularization technique that randomly disables a fraction \
             of neurons during training, which reduces overfitting.",
            "Explain dropout and its benefit.",
        );

        // Sampling is intentional: assert on shape, never on exact text
        let answer = engine.generate(&request).unwrap();
        assert!(answer.len() > 10);
    }

    #[test]
    #[ignore] // requires model download; run with --ignored
    fn test_repeated_calls_succeed() {
        use crate::model::DevicePreference;

        let config = EngineConfig::new("google/flan-t5-small")
            .with_device(DevicePreference::Cpu)
            .with_dtype("f32");
        let generation = GenerationConfig::default().with_max_new_tokens(16);
        let engine = InferenceEngine::load(&config, generation);
        assert!(engine.is_ready());

        let request = GenerationRequest::new(
            "The mitochondria is the powerhouse of the cell.",
            "What is the mitochondria?",
        );

        for _ in 0..20 {
            assert!(engine.generate(&request).is_ok());
        }
    }
}
