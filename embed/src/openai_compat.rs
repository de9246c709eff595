use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::error::EmbedError;

/// OpenAI-compatible embedding request body.
#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: [&'a str; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
    encoding_format: &'a str,
}

/// OpenAI-compatible embedding response.
#[derive(Deserialize)]
struct EmbeddingResponse {
    #[serde(default)]
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    #[serde(default)]
    index: usize,
    embedding: Vec<f64>,
}

/// Error envelope returned alongside non-2xx statuses.
#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Call an OpenAI-compatible embedding endpoint for a single text.
///
/// Authentication is carried by the client's default headers.
pub(crate) async fn call_embedding_api(
    client: &Client,
    endpoint: &str,
    model: &str,
    dimensions: Option<usize>,
    text: &str,
) -> Result<Vec<f64>, EmbedError> {
    let body = EmbeddingRequest {
        model,
        input: [text],
        dimensions,
        encoding_format: "float",
    };

    let resp = client
        .post(endpoint)
        .json(&body)
        .send()
        .await
        .map_err(|e| EmbedError::Transport(e.to_string()))?;

    let status = resp.status();
    let raw = resp
        .text()
        .await
        .map_err(|e| EmbedError::Transport(e.to_string()))?;

    if !status.is_success() {
        let message = error_message(&raw);
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(EmbedError::RateLimited(message));
        }
        return Err(EmbedError::Api {
            status: status.as_u16(),
            message,
        });
    }

    let parsed: EmbeddingResponse =
        serde_json::from_str(&raw).map_err(|e| EmbedError::Decode(e.to_string()))?;

    let mut first = None;
    for item in parsed.data {
        if item.index != 0 {
            return Err(EmbedError::UnexpectedIndex {
                index: item.index,
                batch_size: 1,
            });
        }
        if first.is_none() {
            first = Some(item.embedding);
        }
    }

    // Values pass through at full precision; an empty vector counts as no data.
    first
        .filter(|v| !v.is_empty())
        .ok_or(EmbedError::EmptyResponse)
}

fn error_message(raw: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(raw) {
        Ok(envelope) => envelope.error.message,
        Err(_) if raw.trim().is_empty() => "<empty body>".to_string(),
        Err(_) => raw.trim().to_string(),
    }
}
