use thiserror::Error;

#[derive(Error, Debug)]
pub enum EmbedError {
    #[error("embed: empty input")]
    EmptyInput,

    #[error("embed: invalid client configuration: {0}")]
    Config(String),

    #[error("embed: rate limited: {0}")]
    RateLimited(String),

    #[error("embed: API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("embed: transport error: {0}")]
    Transport(String),

    #[error("embed: invalid response body: {0}")]
    Decode(String),

    #[error("embed: no embedding data returned")]
    EmptyResponse,

    #[error("embed: unexpected embedding index {index} for batch size {batch_size}")]
    UnexpectedIndex { index: usize, batch_size: usize },
}

impl EmbedError {
    /// Returns true if the provider asked the caller to slow down.
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, EmbedError::RateLimited(_))
    }
}
