//! kbgen - embed a knowledge base and write it out as a JavaScript module.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use kbgen_knowledge::Config;
use tracing_subscriber::EnvFilter;

/// Embed every entry of a knowledge base JSON file.
///
/// Reads a JSON array of `{id, title, text}` objects, requests an
/// embedding for each entry and writes a generated JavaScript file
/// binding the entries plus embeddings to a constant.
///
/// The API key is read from the environment (OPENAI_API_KEY by default);
/// a `.env` file in the working directory is loaded first.
#[derive(Parser, Debug)]
#[command(name = "kbgen")]
#[command(about = "Generate embeddings for a knowledge base")]
#[command(version)]
struct Cli {
    /// Config file (YAML or JSON); flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Input knowledge base JSON
    #[arg(short, long, env = "KBGEN_INPUT")]
    input: Option<PathBuf>,

    /// Output JavaScript file
    #[arg(short, long, env = "KBGEN_OUTPUT")]
    output: Option<PathBuf>,

    /// Embedding model identifier
    #[arg(long, env = "KBGEN_MODEL")]
    model: Option<String>,

    /// Base URL of the OpenAI-compatible API
    #[arg(long, env = "KBGEN_BASE_URL")]
    base_url: Option<String>,

    /// Output dimensionality, when the model supports it
    #[arg(long)]
    dimensions: Option<usize>,

    /// Environment variable holding the API key
    #[arg(long)]
    api_key_env: Option<String>,

    /// Name of the generated constant
    #[arg(long)]
    variable: Option<String>,

    /// Milliseconds to pause between requests
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Seconds to wait after a rate limit before retrying
    #[arg(long)]
    cooldown_secs: Option<u64>,

    /// Retries per item after rate limiting
    #[arg(long)]
    max_retries: Option<u32>,

    /// Verbose output
    #[arg(short = 'v', long)]
    verbose: bool,
}

impl Cli {
    fn into_config(self) -> anyhow::Result<Config> {
        let mut cfg = match &self.config {
            Some(path) => Config::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => Config::default(),
        };

        if let Some(v) = self.input {
            cfg.input = v;
        }
        if let Some(v) = self.output {
            cfg.output = v;
        }
        if let Some(v) = self.model {
            cfg.model = v;
        }
        if let Some(v) = self.base_url {
            cfg.base_url = v;
        }
        if self.dimensions.is_some() {
            cfg.dimensions = self.dimensions;
        }
        if let Some(v) = self.api_key_env {
            cfg.api_key_env = v;
        }
        if let Some(v) = self.variable {
            cfg.variable_name = v;
        }
        if let Some(v) = self.delay_ms {
            cfg.request_delay_ms = v;
        }
        if let Some(v) = self.cooldown_secs {
            cfg.rate_limit_cooldown_secs = v;
        }
        if let Some(v) = self.max_retries {
            cfg.max_rate_limit_retries = v;
        }
        Ok(cfg)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // .env must be loaded before clap reads env-backed flags.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    let cfg = match cli.into_config() {
        Ok(cfg) => cfg,
        Err(err) => {
            tracing::error!("{err:#}");
            return ExitCode::FAILURE;
        }
    };

    // Fatal conditions are logged where they occur.
    match kbgen_knowledge::run(&cfg).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
