use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};

use crate::config::EmbedConfig;
use crate::embed::Embedder;
use crate::error::EmbedError;

/// OpenAI embedding models.
pub const MODEL_OPENAI_3_SMALL: &str = "text-embedding-3-small";
pub const MODEL_OPENAI_3_LARGE: &str = "text-embedding-3-large";
pub const MODEL_OPENAI_ADA_002: &str = "text-embedding-ada-002";

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI embedder using the OpenAI embeddings API.
///
/// Also works with any OpenAI-compatible provider via `with_config`
/// and `EmbedConfig::with_base_url`.
pub struct OpenAI {
    client: Client,
    endpoint: String,
    model: String,
    dimensions: Option<usize>,
}

impl OpenAI {
    pub fn new(api_key: &str) -> Result<Self, EmbedError> {
        Self::with_config(api_key, EmbedConfig::default())
    }

    pub fn with_config(api_key: &str, cfg: EmbedConfig) -> Result<Self, EmbedError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(EmbedError::Config("api key must be non-empty".to_string()));
        }

        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|_| EmbedError::Config("api key is not a valid header value".to_string()))?;
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = cfg.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| EmbedError::Config(format!("failed to build HTTP client: {e}")))?;

        let base_url = if cfg.base_url.is_empty() {
            OPENAI_BASE_URL
        } else {
            cfg.base_url.as_str()
        };

        Ok(Self {
            client,
            endpoint: format!("{}/embeddings", base_url.trim_end_matches('/')),
            model: if cfg.model.is_empty() {
                MODEL_OPENAI_3_SMALL.to_string()
            } else {
                cfg.model
            },
            dimensions: cfg.dimensions,
        })
    }

    /// Returns the full embeddings endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl Embedder for OpenAI {
    async fn embed(&self, text: &str) -> Result<Vec<f64>, EmbedError> {
        if text.is_empty() {
            return Err(EmbedError::EmptyInput);
        }
        crate::openai_compat::call_embedding_api(
            &self.client,
            &self.endpoint,
            &self.model,
            self.dimensions,
            text,
        )
        .await
    }

    fn model(&self) -> &str {
        &self.model
    }
}
