//! Model file resolution
//!
//! Resolves a HuggingFace model ID or local directory to the set of files
//! the service needs: model config, safetensors weights, and tokenizer.

use anyhow::{anyhow, Context, Result};
use hf_hub::api::sync::Api;
use std::path::{Path, PathBuf};

/// File locations for a resolved model.
#[derive(Debug, Clone)]
pub struct ModelPath {
    /// Original model ID or directory name
    pub model_id: String,
    /// Path to config.json
    pub config_file: PathBuf,
    /// Path to model.safetensors
    pub weights_file: PathBuf,
    /// Path to tokenizer.json
    pub tokenizer_file: PathBuf,
    /// Path to tokenizer_config.json, when present
    pub tokenizer_config_file: Option<PathBuf>,
}

impl ModelPath {
    /// Build a ModelPath from a local model directory.
    ///
    /// Requires config.json, model.safetensors, and tokenizer.json; weights
    /// must be safetensors because the model is memory-mapped at load time.
    pub fn from_local(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            return Err(anyhow!("Model directory does not exist: {:?}", path));
        }

        let config_file = path.join("config.json");
        if !config_file.exists() {
            return Err(anyhow!("config.json not found in {:?}", path));
        }

        let weights_file = path.join("model.safetensors");
        if !weights_file.exists() {
            return Err(anyhow!(
                "model.safetensors not found in {:?} (only safetensors weights are supported)",
                path
            ));
        }

        let tokenizer_file = path.join("tokenizer.json");
        if !tokenizer_file.exists() {
            return Err(anyhow!("tokenizer.json not found in {:?}", path));
        }

        let tokenizer_config_file = path.join("tokenizer_config.json");

        Ok(Self {
            model_id: path
                .file_name()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string()),
            config_file,
            weights_file,
            tokenizer_file,
            tokenizer_config_file: tokenizer_config_file
                .exists()
                .then_some(tokenizer_config_file),
        })
    }
}

/// Resolves model IDs to local files, downloading from the Hub on a cache
/// miss.
pub struct ModelLoader {
    api: Api,
}

impl ModelLoader {
    /// Create a new loader
    pub fn new() -> Result<Self> {
        let api = Api::new().context("Failed to initialize HuggingFace Hub API")?;
        Ok(Self { api })
    }

    /// Resolve a model ID or path, auto-detecting local directories.
    ///
    /// Anything that exists on disk (or looks like a filesystem path) is
    /// treated as local; everything else is fetched from the Hub.
    pub fn load_model_path(&self, model_id_or_path: &str) -> Result<ModelPath> {
        let local_path = Path::new(model_id_or_path);
        let looks_local = local_path.exists()
            || model_id_or_path.starts_with('.')
            || model_id_or_path.starts_with('/')
            || model_id_or_path.starts_with('~');

        if looks_local && local_path.exists() {
            tracing::info!("Loading model from local path: {}", model_id_or_path);
            ModelPath::from_local(model_id_or_path)
        } else if looks_local {
            Err(anyhow!(
                "Local model path does not exist: {}",
                model_id_or_path
            ))
        } else {
            tracing::info!("Fetching model from HuggingFace Hub: {}", model_id_or_path);
            self.download(model_id_or_path)
        }
    }

    fn download(&self, model_id: &str) -> Result<ModelPath> {
        let repo = self.api.model(model_id.to_string());

        let config_file = repo
            .get("config.json")
            .context("Failed to download config.json")?;

        let weights_file = repo
            .get("model.safetensors")
            .context("Failed to download model.safetensors (only safetensors weights are supported)")?;

        let tokenizer_file = repo
            .get("tokenizer.json")
            .context("Failed to download tokenizer.json")?;

        let tokenizer_config_file = repo.get("tokenizer_config.json").ok();

        Ok(ModelPath {
            model_id: model_id.to_string(),
            config_file,
            weights_file,
            tokenizer_file,
            tokenizer_config_file,
        })
    }
}
