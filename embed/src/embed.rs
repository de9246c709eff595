use crate::error::EmbedError;

/// Embedder converts text into a dense float32 vector.
///
/// Implementations must be safe for concurrent use (Send + Sync).
#[async_trait::async_trait]
pub trait Embedder: Send + Sync {
    /// Return the embedding vector for a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f64>, EmbedError>;

    /// Return the model identifier requests are made with.
    fn model(&self) -> &str;
}
