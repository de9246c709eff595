//! Embedding calls with bounded retry on rate limiting.

use std::time::Duration;

use kbgen_embed::{EmbedError, Embedder};
use thiserror::Error;
use tracing::{debug, warn};

/// Characters of input text shown in log lines.
const PREVIEW_CHARS: usize = 50;

/// How rate-limited requests are retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt; 0 means rate limits are not retried.
    pub max_retries: u32,
    /// Fixed wait before each retry.
    pub cooldown: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            cooldown: Duration::from_secs(10),
        }
    }
}

/// An embedding request that did not produce a vector.
#[derive(Error, Debug)]
#[error("embedding failed after {attempts} attempt(s): {source}")]
pub struct EmbedFailure {
    pub attempts: u32,
    #[source]
    pub source: EmbedError,
}

/// Wraps an [`Embedder`] with the rate-limit retry policy.
pub struct EmbeddingClient<E> {
    embedder: E,
    policy: RetryPolicy,
}

impl<E: Embedder> EmbeddingClient<E> {
    pub fn new(embedder: E, policy: RetryPolicy) -> Self {
        Self { embedder, policy }
    }

    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    pub fn model(&self) -> &str {
        self.embedder.model()
    }

    /// Embeds `text`, retrying the same request while rate limited.
    ///
    /// Any failure is logged with a short preview of the text.
    pub async fn embed(&self, text: &str) -> Result<Vec<f64>, EmbedFailure> {
        let mut attempts = 0u32;
        loop {
            attempts += 1;
            let err = match self.embedder.embed(text).await {
                Ok(vector) => return Ok(vector),
                Err(err) => err,
            };

            if err.is_rate_limit() && attempts <= self.policy.max_retries {
                warn!(
                    "rate limit exceeded, waiting {:?} before retry {}/{}",
                    self.policy.cooldown, attempts, self.policy.max_retries
                );
                tokio::time::sleep(self.policy.cooldown).await;
                continue;
            }

            match &err {
                EmbedError::EmptyResponse => {
                    warn!("no embedding data returned for text: {}...", preview(text))
                }
                EmbedError::RateLimited(_) => warn!(
                    "still rate limited after {} retries for text '{}...': {err}",
                    self.policy.max_retries,
                    preview(text)
                ),
                _ => warn!("embedding error for text '{}...': {err}", preview(text)),
            }
            debug!(attempts, "giving up on item");
            return Err(EmbedFailure {
                attempts,
                source: err,
            });
        }
    }
}

/// First [`PREVIEW_CHARS`] characters of `text`, cut on a char boundary.
pub(crate) fn preview(text: &str) -> &str {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    /// Embedder that replays a script of responses and records every call.
    pub(crate) struct ScriptedEmbedder {
        script: Mutex<VecDeque<Result<Vec<f64>, EmbedError>>>,
        pub(crate) calls: Mutex<Vec<String>>,
    }

    impl ScriptedEmbedder {
        pub(crate) fn new(script: Vec<Result<Vec<f64>, EmbedError>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait::async_trait]
    impl Embedder for ScriptedEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f64>, EmbedError> {
            self.calls.lock().unwrap().push(text.to_string());
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(EmbedError::EmptyResponse))
        }

        fn model(&self) -> &str {
            "scripted"
        }
    }

    fn rate_limited() -> Result<Vec<f64>, EmbedError> {
        Err(EmbedError::RateLimited("slow down".into()))
    }

    fn no_wait(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            cooldown: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn success_needs_one_call() {
        let client = EmbeddingClient::new(ScriptedEmbedder::new(vec![Ok(vec![1.0, 2.0])]), no_wait(3));
        assert_eq!(client.embed("hello").await.unwrap(), vec![1.0, 2.0]);
        assert_eq!(client.embedder.call_count(), 1);
    }

    #[tokio::test]
    async fn single_rate_limit_is_transparent() {
        let client = EmbeddingClient::new(
            ScriptedEmbedder::new(vec![rate_limited(), Ok(vec![0.5])]),
            no_wait(1),
        );
        assert_eq!(client.embed("hello").await.unwrap(), vec![0.5]);
        let calls = client.embedder.calls.lock().unwrap().clone();
        assert_eq!(calls, vec!["hello".to_string(), "hello".to_string()]);
    }

    #[tokio::test]
    async fn persistent_rate_limit_is_bounded() {
        let client = EmbeddingClient::new(
            ScriptedEmbedder::new(vec![rate_limited(), rate_limited(), rate_limited(), Ok(vec![1.0])]),
            no_wait(2),
        );
        let failure = client.embed("hello").await.unwrap_err();
        assert_eq!(failure.attempts, 3);
        assert!(failure.source.is_rate_limit());
        assert_eq!(client.embedder.call_count(), 3);
    }

    #[tokio::test]
    async fn zero_retries_fails_immediately() {
        let client = EmbeddingClient::new(ScriptedEmbedder::new(vec![rate_limited()]), no_wait(0));
        let failure = client.embed("hello").await.unwrap_err();
        assert_eq!(failure.attempts, 1);
    }

    #[tokio::test]
    async fn api_error_not_retried() {
        let client = EmbeddingClient::new(
            ScriptedEmbedder::new(vec![
                Err(EmbedError::Api {
                    status: 400,
                    message: "bad input".into(),
                }),
                Ok(vec![1.0]),
            ]),
            no_wait(3),
        );
        let failure = client.embed("hello").await.unwrap_err();
        assert_eq!(failure.attempts, 1);
        assert!(matches!(failure.source, EmbedError::Api { status: 400, .. }));
        assert_eq!(client.embedder.call_count(), 1);
    }

    #[tokio::test]
    async fn empty_response_is_a_failure() {
        let client = EmbeddingClient::new(
            ScriptedEmbedder::new(vec![Err(EmbedError::EmptyResponse)]),
            no_wait(3),
        );
        let failure = client.embed("hello").await.unwrap_err();
        assert!(matches!(failure.source, EmbedError::EmptyResponse));
    }

    #[test]
    fn preview_respects_char_boundaries() {
        let long = "é".repeat(80);
        assert_eq!(preview(&long).chars().count(), 50);
        assert_eq!(preview("short"), "short");
    }
}
