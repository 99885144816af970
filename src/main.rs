use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docchat::chat::{EngineConfig, GenerationConfig, GenerationRequest, InferenceEngine};
use docchat::server::{self, AppState};

#[derive(Parser)]
#[command(name = "docchat")]
#[command(about = "DocChat - document Q&A over a locally-loaded seq2seq model", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the model and start the HTTP API server
    Serve {
        /// Server address
        #[arg(long, default_value = "127.0.0.1:8080")]
        addr: String,

        /// Model name or path (HuggingFace model ID or local directory)
        #[arg(short, long, default_value = "google/flan-t5-base")]
        model: String,

        /// Device: auto, cpu, cuda, or metal
        #[arg(long, default_value = "auto")]
        device: String,

        /// Model dtype: auto, f32, f16, or bf16
        #[arg(long, default_value = "auto")]
        dtype: String,

        /// Directory with the built frontend to serve at /
        #[arg(long)]
        static_dir: Option<PathBuf>,

        /// Most recent history turns rendered into the prompt
        #[arg(long, default_value = "20")]
        max_history_turns: usize,
    },

    /// Ask a single question about a document from the command line
    Ask {
        /// Model name or path (HuggingFace model ID or local directory)
        #[arg(short, long, default_value = "google/flan-t5-base")]
        model: String,

        /// Path to a UTF-8 text file containing the document
        #[arg(short, long)]
        document: PathBuf,

        /// The question to ask
        #[arg(short, long)]
        query: String,

        /// Device: auto, cpu, cuda, or metal
        #[arg(long, default_value = "auto")]
        device: String,

        /// Model dtype: auto, f32, f16, or bf16
        #[arg(long, default_value = "auto")]
        dtype: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docchat=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            addr,
            model,
            device,
            dtype,
            static_dir,
            max_history_turns,
        } => {
            let config = EngineConfig::new(&model)
                .with_device(device.parse()?)
                .with_dtype(&dtype)
                .with_max_history_turns(max_history_turns);

            // Model loading is CPU/IO heavy; keep it off the runtime
            // threads. A failed load leaves the engine unavailable and the
            // server still starts, reporting NotReady per request.
            let engine = tokio::task::spawn_blocking(move || {
                InferenceEngine::load(&config, GenerationConfig::default())
            })
            .await?;

            let state = AppState::new(Arc::new(engine));
            server::serve(&addr, state, static_dir).await?;
        }

        Commands::Ask {
            model,
            document,
            query,
            device,
            dtype,
        } => {
            let document_text = std::fs::read_to_string(&document)?;

            let config = EngineConfig::new(&model)
                .with_device(device.parse()?)
                .with_dtype(&dtype);

            let engine = tokio::task::spawn_blocking(move || {
                InferenceEngine::load(&config, GenerationConfig::default())
            })
            .await?;

            let request = GenerationRequest::new(&document_text, &query);
            let answer =
                tokio::task::spawn_blocking(move || engine.generate(&request)).await??;
            println!("{answer}");
        }
    }

    Ok(())
}
