//! Batch driver: load, embed each record in order, write the artifact.

use std::path::PathBuf;
use std::time::Duration;

use kbgen_embed::{Embedder, OpenAI};
use tracing::{error, info, warn};

use crate::artifact::write_artifact;
use crate::client::{EmbedFailure, EmbeddingClient};
use crate::config::Config;
use crate::error::RunError;
use crate::loader::load_knowledge_base;
use crate::record::{AugmentedRecord, KnowledgeRecord};

/// What happened to one input record.
#[derive(Debug)]
pub enum ItemOutcome {
    Embedded(AugmentedRecord),
    SkippedEmptyText,
    SkippedEmbedFailure(EmbedFailure),
}

/// Counts reported at the end of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub embedded: usize,
    pub skipped_empty: usize,
    pub skipped_failed: usize,
    pub output: PathBuf,
}

/// Sequential embedding pipeline over one input file.
pub struct Pipeline<E> {
    config: Config,
    client: EmbeddingClient<E>,
    request_delay: Duration,
}

impl<E: Embedder> Pipeline<E> {
    pub fn new(config: &Config, embedder: E) -> Self {
        Self {
            config: config.clone(),
            client: EmbeddingClient::new(embedder, config.retry_policy()),
            request_delay: config.request_delay(),
        }
    }

    /// Embeds a single record. Empty text never reaches the embedder.
    pub async fn process(&self, record: KnowledgeRecord) -> ItemOutcome {
        let Some(text) = record.embeddable_text() else {
            warn!("skipping item {} due to empty text", record.display_id());
            return ItemOutcome::SkippedEmptyText;
        };

        match self.client.embed(&text).await {
            Ok(embedding) => ItemOutcome::Embedded(record.augment(embedding)),
            Err(failure) => ItemOutcome::SkippedEmbedFailure(failure),
        }
    }

    /// Runs the whole batch and writes the artifact.
    pub async fn run(&self) -> Result<RunSummary, RunError> {
        let records = load_knowledge_base(&self.config.input)?;
        if records.is_empty() {
            error!("no items in {}, nothing to do", self.config.input.display());
            return Err(RunError::EmptyInput(self.config.input.clone()));
        }

        let total = records.len();
        info!("starting embedding generation using model: {}", self.client.model());

        let mut embedded: Vec<AugmentedRecord> = Vec::with_capacity(total);
        let mut skipped_empty = 0usize;
        let mut skipped_failed = 0usize;

        for (i, record) in records.into_iter().enumerate() {
            let id = record.display_id();
            info!("processing item {}/{} (ID: {})", i + 1, total, id);

            match self.process(record).await {
                ItemOutcome::Embedded(augmented) => {
                    embedded.push(augmented);
                    info!("  embedding generated successfully");
                }
                ItemOutcome::SkippedEmptyText => {
                    // No request was made; skip the pause.
                    skipped_empty += 1;
                    continue;
                }
                ItemOutcome::SkippedEmbedFailure(_) => {
                    skipped_failed += 1;
                    warn!("  failed to generate embedding for item {id}, skipping");
                }
            }

            if i + 1 < total && !self.request_delay.is_zero() {
                tokio::time::sleep(self.request_delay).await;
            }
        }

        if let Err(err) = write_artifact(&self.config.output, &embedded, &self.config.variable_name)
        {
            error!("{err}");
            return Err(err.into());
        }

        info!(
            "successfully generated embeddings for {} items ({} skipped: {} empty, {} failed)",
            embedded.len(),
            skipped_empty + skipped_failed,
            skipped_empty,
            skipped_failed
        );
        info!("output saved to {}", self.config.output.display());

        Ok(RunSummary {
            total,
            embedded: embedded.len(),
            skipped_empty,
            skipped_failed,
            output: self.config.output.clone(),
        })
    }
}

/// Resolves the API key, builds the OpenAI client and runs the pipeline.
pub async fn run(config: &Config) -> Result<RunSummary, RunError> {
    let api_key = resolve_api_key(&config.api_key_env, std::env::var(&config.api_key_env).ok())?;

    let embedder = OpenAI::with_config(&api_key, config.embed_config()).map_err(|err| {
        error!("error initializing embedding client: {err}");
        RunError::Client(err)
    })?;

    Pipeline::new(config, embedder).run().await
}

fn resolve_api_key(var: &str, value: Option<String>) -> Result<String, RunError> {
    match value {
        Some(key) if !key.trim().is_empty() => Ok(key),
        _ => {
            error!("{var} not found in .env file or environment variables");
            Err(RunError::MissingApiKey(var.to_string()))
        }
    }
}
