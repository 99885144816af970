//! # DocChat
//!
//! A document Q&A service backed by a locally-loaded seq2seq model.
//!
//! ## Overview
//!
//! DocChat answers natural-language questions about a user-supplied
//! document. Each request carries the document text, the current query,
//! and the full conversation history; the service merges them into one
//! prompt, truncates it to the model's context budget, and runs sampled
//! generation on a flan-t5-family model loaded once at startup.
//!
//! ## Architecture
//!
//! - `chat` - Prompt construction and inference orchestration
//! - `model` - Device selection, Hub downloads, tokenizer, model handle
//! - `server` - Axum-based REST API
//!
//! The service is stateless across calls: conversation history lives with
//! the caller and is passed in full on every request.

pub mod chat;
pub mod model;
pub mod server;

// Re-export commonly used types
pub use anyhow::{Error, Result};
