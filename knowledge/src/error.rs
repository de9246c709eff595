use std::path::PathBuf;

use kbgen_embed::EmbedError;
use thiserror::Error;

/// Failure reading the knowledge base input file.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("input file not found at {}", .0.display())]
    NotFound(PathBuf),

    #[error("could not decode JSON from {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure producing the output artifact.
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("failed to serialize records: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("error writing output file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure reading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {message}", path.display())]
    Invalid { path: PathBuf, message: String },

    #[error("unsupported config extension for {} (expected .yaml, .yml or .json)", .0.display())]
    UnsupportedFormat(PathBuf),
}

/// Fatal conditions that end a run before or after the per-item loop.
///
/// Per-item embedding failures are not represented here; they are
/// reported through [`crate::ItemOutcome`] and never abort a run.
#[derive(Error, Debug)]
pub enum RunError {
    #[error("{0} not found in .env file or environment variables")]
    MissingApiKey(String),

    #[error("error initializing embedding client: {0}")]
    Client(#[source] EmbedError),

    #[error(transparent)]
    Input(#[from] LoadError),

    #[error("input file {} contains no items", .0.display())]
    EmptyInput(PathBuf),

    #[error(transparent)]
    Output(#[from] ArtifactError),
}
