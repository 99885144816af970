//! Error taxonomy for the Q&A pipeline
//!
//! All failure classification happens in the inference engine; the prompt
//! builder itself never fails. Errors carry a distinct user-visible
//! message per kind and are never silently retried.

use thiserror::Error;

/// Errors surfaced by the inference engine.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The model or tokenizer never finished loading. Permanent for the
    /// process; every call fails identically until restart.
    #[error("AI model is not loaded or failed to initialize.")]
    NotReady,

    /// A required input was empty. The HTTP boundary validates before the
    /// engine is invoked; this is the engine's defensive backstop.
    #[error("'{0}' must not be empty")]
    EmptyInput(&'static str),

    /// The generation call itself failed (resource exhaustion, device
    /// fault, decode error). Wraps the underlying cause for diagnostics.
    #[error("Failed to generate response from AI model. Please try again.")]
    Inference(#[source] anyhow::Error),
}

impl ChatError {
    /// Whether this error is the caller's fault (as opposed to a server
    /// fault). Used by the HTTP layer for status mapping.
    pub fn is_client_error(&self) -> bool {
        matches!(self, ChatError::EmptyInput(_))
    }
}
