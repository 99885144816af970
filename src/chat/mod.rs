//! Document Q&A pipeline
//!
//! This module turns a (document, query, history) triple into generated
//! answer text using a locally-loaded seq2seq model.
//!
//! # Architecture
//!
//! ```text
//! GenerationRequest
//!     │
//!     ▼
//! ┌──────────────┐
//! │    Prompt    │  ← Merges instructions, document, history, query
//! │    Builder   │    into one prompt string
//! └──────────────┘
//!     │
//!     ▼ prompt text
//! ┌──────────────┐
//! │  Inference   │  ← Tokenizes, truncates to the input budget,
//! │    Engine    │    runs sampled generation on the ModelHandle
//! └──────────────┘
//!     │
//!     ▼
//! answer text (or typed ChatError)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use docchat::chat::{EngineConfig, GenerationConfig, GenerationRequest, InferenceEngine};
//!
//! let engine = InferenceEngine::load(&EngineConfig::default(), GenerationConfig::default());
//! let request = GenerationRequest::new("Dropout is a regularization technique...",
//!                                      "Explain dropout.");
//! let answer = engine.generate(&request)?;
//! println!("{answer}");
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod prompt;
pub mod request;

pub use config::{EngineConfig, GenerationConfig};
pub use engine::InferenceEngine;
pub use error::ChatError;
pub use prompt::PromptBuilder;
pub use request::{ConversationTurn, GenerationRequest};
