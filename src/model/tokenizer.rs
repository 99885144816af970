//! Tokenizer wrapper
//!
//! Thin interface over the HuggingFace tokenizer: encode, decode, and the
//! model's maximum context length (read from tokenizer_config.json).

use anyhow::Result;
use std::path::Path;
use tokenizers::Tokenizer;

use super::hub::ModelPath;

/// Context length assumed when tokenizer_config.json does not declare one.
/// 512 is the t5-family value.
pub const DEFAULT_MODEL_MAX_LENGTH: usize = 512;

/// Wrapper around a HuggingFace tokenizer.
pub struct TokenizerWrapper {
    tokenizer: Tokenizer,
    model_max_length: usize,
}

impl TokenizerWrapper {
    /// Load the tokenizer from a resolved model path.
    pub fn from_model_path(model_path: &ModelPath) -> Result<Self> {
        let tokenizer = Tokenizer::from_file(&model_path.tokenizer_file)
            .map_err(|e| anyhow::anyhow!("Failed to load tokenizer: {e}"))?;

        let model_max_length = model_path
            .tokenizer_config_file
            .as_deref()
            .and_then(read_model_max_length)
            .unwrap_or(DEFAULT_MODEL_MAX_LENGTH);

        Ok(Self {
            tokenizer,
            model_max_length,
        })
    }

    /// The model's maximum context length in tokens.
    pub fn model_max_length(&self) -> usize {
        self.model_max_length
    }

    /// Encode text into token IDs.
    pub fn encode(&self, text: &str, add_special_tokens: bool) -> Result<Vec<u32>> {
        let encoding = self
            .tokenizer
            .encode(text, add_special_tokens)
            .map_err(|e| anyhow::anyhow!("Tokenization failed: {e}"))?;

        Ok(encoding.get_ids().to_vec())
    }

    /// Decode token IDs back into text.
    pub fn decode(&self, ids: &[u32], skip_special_tokens: bool) -> Result<String> {
        self.tokenizer
            .decode(ids, skip_special_tokens)
            .map_err(|e| anyhow::anyhow!("Decoding failed: {e}"))
    }
}

/// Read `model_max_length` from a tokenizer_config.json.
///
/// Returns None when the file is unreadable, the field is absent, or the
/// value does not fit (some configs use a sentinel larger than u64).
fn read_model_max_length(path: &Path) -> Option<usize> {
    let content = std::fs::read_to_string(path).ok()?;
    let config: serde_json::Value = serde_json::from_str(&content).ok()?;
    config
        .get("model_max_length")?
        .as_u64()
        .map(|v| v as usize)
}
