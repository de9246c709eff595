//! Knowledge base embedding pipeline.
//!
//! Reads knowledge records from a JSON array, requests an embedding for
//! each record's text and writes a generated JavaScript artifact binding
//! the augmented records to a constant.

pub mod artifact;
pub mod client;
pub mod config;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod record;

pub use artifact::{render_artifact, write_artifact};
pub use client::{EmbedFailure, EmbeddingClient, RetryPolicy};
pub use config::Config;
pub use error::{ArtifactError, ConfigError, LoadError, RunError};
pub use loader::load_knowledge_base;
pub use pipeline::{ItemOutcome, Pipeline, RunSummary, run};
pub use record::{AugmentedRecord, KnowledgeRecord};
