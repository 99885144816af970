//! Loaded seq2seq model handle
//!
//! Owns the T5 conditional-generation model and its tokenizer for the
//! process lifetime. Loaded once at startup; read-only for inference
//! afterwards. The model sits behind a Mutex because its KV cache needs
//! mutable access, which also serializes generation to one call at a time.

use anyhow::{Context, Result};
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::generation::LogitsProcessor;
use candle_transformers::models::t5;
use std::sync::Mutex;

use crate::chat::config::{EngineConfig, GenerationConfig};

use super::device::{select_device, select_dtype};
use super::hub::ModelLoader;
use super::tokenizer::TokenizerWrapper;

/// The loaded, ready-to-use model and tokenizer pair.
pub struct ModelHandle {
    model: Mutex<t5::T5ForConditionalGeneration>,
    tokenizer: TokenizerWrapper,
    config: t5::Config,
    device: Device,
}

impl ModelHandle {
    /// Load the model and tokenizer described by the engine config.
    pub fn load(config: &EngineConfig) -> Result<Self> {
        let device = select_device(config.device)?;

        tracing::info!("Attempting to load model '{}'...", config.model_id);
        tracing::info!("  Device: {:?}", device);

        let loader = ModelLoader::new()?;
        let model_path = loader.load_model_path(&config.model_id)?;

        let tokenizer = TokenizerWrapper::from_model_path(&model_path)
            .context("Failed to load tokenizer")?;

        let config_str = std::fs::read_to_string(&model_path.config_file)
            .context("Failed to read model config")?;

        let raw: serde_json::Value =
            serde_json::from_str(&config_str).context("Failed to parse model config")?;
        let model_type = raw["model_type"].as_str().unwrap_or("").to_lowercase();
        if model_type != "t5" {
            anyhow::bail!(
                "Unsupported model architecture: {}. Supported: t5",
                model_type
            );
        }

        let t5_config: t5::Config =
            serde_json::from_str(&config_str).context("Failed to parse t5 config")?;

        let dtype = select_dtype(&config.dtype, &device)?;
        tracing::info!("  Dtype: {:?}", dtype);

        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[&model_path.weights_file], dtype, &device)
                .context("Failed to load model weights")?
        };

        let model = t5::T5ForConditionalGeneration::load(vb, &t5_config)
            .context("Failed to build model")?;

        tracing::info!("Model '{}' loaded successfully", config.model_id);

        Ok(Self {
            model: Mutex::new(model),
            tokenizer,
            config: t5_config,
            device,
        })
    }

    /// The tokenizer paired with this model.
    pub fn tokenizer(&self) -> &TokenizerWrapper {
        &self.tokenizer
    }

    /// Run one sampled generation over the already-tokenized prompt and
    /// return the decoded answer.
    ///
    /// Only decoder-side (newly generated) tokens are decoded; special
    /// tokens are stripped and surrounding whitespace trimmed. EOS, pad,
    /// and decoder-start ids come from the model's configuration.
    pub fn generate(&self, input_ids: &[u32], params: &GenerationConfig) -> Result<String> {
        if input_ids.is_empty() {
            anyhow::bail!("Empty prompt after tokenization");
        }

        let input = Tensor::new(input_ids, &self.device)?.unsqueeze(0)?;

        let mut model = self
            .model
            .lock()
            .map_err(|e| anyhow::anyhow!("Model lock poisoned: {e}"))?;
        model.clear_kv_cache();

        let encoder_output = model.encode(&input)?;

        let start_token = self
            .config
            .decoder_start_token_id
            .unwrap_or(self.config.pad_token_id) as u32;
        let mut output_ids = vec![start_token];

        let mut sampler = LogitsProcessor::new(
            params.seed,
            Some(params.temperature),
            Some(params.top_p),
        );

        for step in 0..params.max_new_tokens {
            let decoder_input = if step == 0 || !self.config.use_cache {
                Tensor::new(output_ids.as_slice(), &self.device)?.unsqueeze(0)?
            } else {
                let last = output_ids[output_ids.len() - 1];
                Tensor::new(&[last], &self.device)?.unsqueeze(0)?
            };

            let logits = model
                .decode(&decoder_input, &encoder_output)?
                .squeeze(0)?
                .to_dtype(DType::F32)?;

            let logits = if params.top_k > 0 {
                top_k_filter(&logits, params.top_k)?
            } else {
                logits
            };

            let next = sampler.sample(&logits)?;
            if next as usize == self.config.eos_token_id {
                tracing::debug!("Generation stopped: EOS after {step} tokens");
                break;
            }
            output_ids.push(next);
        }

        let answer = self.tokenizer.decode(&output_ids[1..], true)?;
        Ok(answer.trim().to_string())
    }
}

/// Mask all but the k highest logits to negative infinity.
fn top_k_filter(logits: &Tensor, k: usize) -> Result<Tensor> {
    let vocab_size = logits.dim(0)?;
    if k >= vocab_size {
        return Ok(logits.clone());
    }

    let logits_vec: Vec<f32> = logits.to_vec1()?;
    let mut indexed: Vec<(usize, f32)> = logits_vec.iter().copied().enumerate().collect();
    indexed.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut filtered = vec![f32::NEG_INFINITY; vocab_size];
    for (idx, val) in indexed.into_iter().take(k) {
        filtered[idx] = val;
    }

    Ok(Tensor::new(&filtered[..], logits.device())?)
}
