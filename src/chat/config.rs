//! Configuration for the inference engine
//!
//! Defines the engine's model settings and the process-wide generation
//! parameters. Both are fixed after startup; per-call logic never mutates
//! them.

use serde::{Deserialize, Serialize};

use crate::model::DevicePreference;

/// Sampling and length-limit parameters for text generation.
///
/// These are process-wide constants: every call generates with the same
/// configuration, and exactly one output sequence is produced per call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Maximum newly generated tokens per call
    pub max_new_tokens: usize,

    /// Sampling temperature (sampling is always on; this is never 0)
    pub temperature: f64,

    /// Top-k sampling: limit each step to the k most likely tokens
    pub top_k: usize,

    /// Nucleus (top-p) sampling: cumulative probability threshold
    pub top_p: f64,

    /// Seed for the sampler's RNG stream
    pub seed: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_new_tokens: 500,
            temperature: 0.7,
            top_k: 50,
            top_p: 0.95,
            seed: 299792458,
        }
    }
}

impl GenerationConfig {
    /// Set max new tokens
    pub fn with_max_new_tokens(mut self, max_new_tokens: usize) -> Self {
        self.max_new_tokens = max_new_tokens;
        self
    }

    /// Set temperature
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set top-k
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Set top-p
    pub fn with_top_p(mut self, top_p: f64) -> Self {
        self.top_p = top_p;
        self
    }

    /// Set the sampler seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Configuration for initializing the engine's model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// HuggingFace model ID or local path
    pub model_id: String,

    /// Device preference (auto, cuda, metal, cpu)
    pub device: DevicePreference,

    /// Model data type ("auto", "f32", "f16", "bf16"); "auto" picks bf16
    /// on CUDA and f32 elsewhere
    pub dtype: String,

    /// Only the most recent N history turns are rendered into the prompt
    pub max_history_turns: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            model_id: "google/flan-t5-base".to_string(),
            device: DevicePreference::Auto,
            dtype: "auto".to_string(),
            max_history_turns: 20,
        }
    }
}

impl EngineConfig {
    /// Create a new engine config with the given model ID
    pub fn new(model_id: &str) -> Self {
        Self {
            model_id: model_id.to_string(),
            ..Default::default()
        }
    }

    /// Set the device preference
    pub fn with_device(mut self, device: DevicePreference) -> Self {
        self.device = device;
        self
    }

    /// Set the data type
    pub fn with_dtype(mut self, dtype: &str) -> Self {
        self.dtype = dtype.to_string();
        self
    }

    /// Set the history window size
    pub fn with_max_history_turns(mut self, turns: usize) -> Self {
        self.max_history_turns = turns;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_config_defaults() {
        let config = GenerationConfig::default();

        assert_eq!(config.max_new_tokens, 500);
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.top_k, 50);
        assert_eq!(config.top_p, 0.95);
    }

    #[test]
    fn test_generation_config_builder() {
        let config = GenerationConfig::default()
            .with_max_new_tokens(128)
            .with_temperature(0.9)
            .with_top_k(10);

        assert_eq!(config.max_new_tokens, 128);
        assert_eq!(config.temperature, 0.9);
        assert_eq!(config.top_k, 10);
    }

    #[test]
    fn test_engine_config_defaults() {
        let config = EngineConfig::default();

        assert_eq!(config.model_id, "google/flan-t5-base");
        assert_eq!(config.dtype, "auto");
        assert_eq!(config.max_history_turns, 20);
    }

    #[test]
    fn test_engine_config_builder() {
        let config = EngineConfig::new("google/flan-t5-small")
            .with_dtype("f32")
            .with_max_history_turns(5);

        assert_eq!(config.model_id, "google/flan-t5-small");
        assert_eq!(config.dtype, "f32");
        assert_eq!(config.max_history_turns, 5);
    }
}
