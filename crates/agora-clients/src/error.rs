//! Internal error types for provider calls.
//!
//! These errors are internal to `agora-clients` and are mapped to
//! [`ProviderError`] at the port boundary.

use agora_core::ProviderError;
use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The API answered with an error status.
    #[error("API request failed with status {status}: {message}")]
    ApiRequestFailed { status: u16, message: String },

    /// The API answered with a body we could not interpret.
    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl ClientError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    pub(crate) const fn status(&self) -> Option<u16> {
        match self {
            Self::ApiRequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<ClientError> for ProviderError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::ApiRequestFailed { status, message } => Self::Rejected { status, message },
            ClientError::Network(e) => Self::Network(e.to_string()),
            ClientError::InvalidResponse { message } => Self::InvalidResponse(message),
            ClientError::InvalidUrl(e) => Self::InvalidResponse(e.to_string()),
            ClientError::JsonParse(e) => Self::InvalidResponse(e.to_string()),
        }
    }
}

/// Pull a human-readable message out of an error body.
///
/// Understands `{"error": {"message": ..}}` (Stripe, OpenAI),
/// `{"error_message": ..}` (Marqeta) and `{"message": ..}` (PlantNet).
pub(crate) fn error_message(body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    let from_json = parsed.as_ref().and_then(|json| {
        json.pointer("/error/message")
            .or_else(|| json.get("error_message"))
            .or_else(|| json.get("message"))
            .or_else(|| json.get("error"))
            .and_then(serde_json::Value::as_str)
            .map(str::to_string)
    });

    from_json.unwrap_or_else(|| {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            "empty response body".to_string()
        } else {
            trimmed.chars().take(200).collect()
        }
    })
}
