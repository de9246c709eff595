//! Run configuration.
//!
//! Every field has a default, so a config file only needs the keys it
//! overrides. Files are YAML (`.yaml`, `.yml`) or JSON (`.json`).

use std::path::{Path, PathBuf};
use std::time::Duration;

use kbgen_embed::EmbedConfig;
use kbgen_embed::openai::{MODEL_OPENAI_3_SMALL, OPENAI_BASE_URL};
use serde::{Deserialize, Serialize};

use crate::client::RetryPolicy;
use crate::error::ConfigError;

pub const DEFAULT_INPUT: &str = "./knowledge.json";
pub const DEFAULT_OUTPUT: &str = "./knowledge_embeddings.js";
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const DEFAULT_VARIABLE_NAME: &str = "knowledgeBaseWithEmbeddings";

/// Pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// JSON array of knowledge records.
    pub input: PathBuf,

    /// Generated artifact path, overwritten on each run.
    pub output: PathBuf,

    /// Embedding model identifier.
    pub model: String,

    /// OpenAI-compatible API base URL.
    pub base_url: String,

    /// Output dimensionality override, when the model supports it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<usize>,

    /// Name of the environment variable holding the API key.
    pub api_key_env: String,

    /// Identifier the artifact binds the records to.
    pub variable_name: String,

    /// Pause between consecutive embedding requests.
    pub request_delay_ms: u64,

    /// Wait before retrying a rate-limited request.
    pub rate_limit_cooldown_secs: u64,

    /// Retries allowed per item after rate limiting.
    pub max_rate_limit_retries: u32,

    /// HTTP request timeout; 0 disables it.
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            model: MODEL_OPENAI_3_SMALL.to_string(),
            base_url: OPENAI_BASE_URL.to_string(),
            dimensions: None,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            variable_name: DEFAULT_VARIABLE_NAME.to_string(),
            request_delay_ms: 100,
            rate_limit_cooldown_secs: 10,
            max_rate_limit_retries: 3,
            timeout_secs: 60,
        }
    }
}

impl Config {
    /// Loads a config file, choosing the format from its extension.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");
        let data = std::fs::read(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let invalid = |message: String| ConfigError::Invalid {
            path: path.to_path_buf(),
            message,
        };

        match ext {
            "json" => serde_json::from_slice(&data).map_err(|e| invalid(e.to_string())),
            "yaml" | "yml" => serde_yaml::from_slice(&data).map_err(|e| invalid(e.to_string())),
            _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_rate_limit_retries,
            cooldown: Duration::from_secs(self.rate_limit_cooldown_secs),
        }
    }

    /// Settings for the embedding provider client.
    pub fn embed_config(&self) -> EmbedConfig {
        let mut cfg = EmbedConfig::default()
            .with_model(&self.model)
            .with_base_url(&self.base_url);
        if let Some(dim) = self.dimensions {
            cfg = cfg.with_dimensions(dim);
        }
        if self.timeout_secs > 0 {
            cfg = cfg.with_timeout(Duration::from_secs(self.timeout_secs));
        }
        cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_overrides_only_given_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kbgen.yaml");
        std::fs::write(
            &path,
            "input: data/kb.json\nmodel: text-embedding-3-large\nmax_rate_limit_retries: 5\n",
        )
        .unwrap();

        let cfg = Config::load(&path).unwrap();
        assert_eq!(cfg.input, PathBuf::from("data/kb.json"));
        assert_eq!(cfg.model, "text-embedding-3-large");
        assert_eq!(cfg.max_rate_limit_retries, 5);
        assert_eq!(cfg.output, PathBuf::from(DEFAULT_OUTPUT));
        assert_eq!(cfg.request_delay(), Duration::from_millis(100));
        assert_eq!(cfg.retry_policy().cooldown, Duration::from_secs(10));
    }

    #[test]
    fn json_config_supported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kbgen.json");
        std::fs::write(&path, r#"{"dimensions": 256, "variable_name": "kb"}"#).unwrap();

        let cfg = Config::load(&path).unwrap();
        assert_eq!(cfg.dimensions, Some(256));
        assert_eq!(cfg.variable_name, "kb");
        assert_eq!(cfg.embed_config().dimensions, Some(256));
    }

    #[test]
    fn unknown_extension_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kbgen.toml");
        std::fs::write(&path, "model = 'x'").unwrap();
        assert!(matches!(
            Config::load(&path),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn zero_timeout_disables_it() {
        let cfg = Config {
            timeout_secs: 0,
            ..Config::default()
        };
        assert!(cfg.embed_config().timeout.is_none());
    }
}
