//! Axum-specific error types and mappings.
//!
//! This module provides the error type returned by handlers and the mapping
//! from `CoreError` to HTTP status codes and JSON bodies. Stable client
//! messages such as `user_exists` or `invalid_password` travel in `message`.

use agora_core::{CoreError, ProviderError, RepositoryError};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// Axum-specific error type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Bad request (invalid input).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Missing, expired or invalid credentials.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated but not allowed.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Conflict (resource already exists, state does not allow the change).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A third-party provider has no credentials configured.
    #[error("Service unavailable: {0}")]
    ProviderNotConfigured(String),

    /// A third-party provider failed or answered with an error.
    #[error("Bad gateway: {0}")]
    BadGateway(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    message: String,
    status: u16,
    /// Stable error type discriminant for client-side handling
    #[serde(skip_serializing_if = "Option::is_none", rename = "type")]
    error_type: Option<&'static str>,
}

impl HttpError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::ProviderNotConfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::BadGateway(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    const fn error_type(&self) -> Option<&'static str> {
        match self {
            Self::ProviderNotConfigured(_) => Some("PROVIDER_NOT_CONFIGURED"),
            Self::BadGateway(_) => Some("PROVIDER_FAILED"),
            _ => None,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_type = self.error_type();
        let message = match self {
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Request failed");
                msg
            }
            Self::BadGateway(msg) => {
                tracing::warn!(error = %msg, "Provider call failed");
                msg
            }
            Self::BadRequest(msg)
            | Self::Unauthorized(msg)
            | Self::Forbidden(msg)
            | Self::NotFound(msg)
            | Self::Conflict(msg)
            | Self::ProviderNotConfigured(msg) => msg,
        };

        let body = ErrorBody {
            message,
            status: status.as_u16(),
            error_type,
        };

        let mut response = (status, axum::Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

impl From<CoreError> for HttpError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Repository(repo_err) => repo_err.into(),
            CoreError::Provider(provider_err) => provider_err.into(),
            CoreError::Validation(msg) => Self::BadRequest(msg),
            CoreError::Unauthorized(msg) => Self::Unauthorized(msg),
            CoreError::Forbidden(msg) => Self::Forbidden(msg),
            CoreError::Conflict(msg) => Self::Conflict(msg),
            CoreError::NotFound(msg) => Self::NotFound(msg),
            CoreError::Internal(msg) => Self::Internal(msg),
        }
    }
}

impl From<RepositoryError> for HttpError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(msg) => Self::NotFound(msg),
            RepositoryError::AlreadyExists(msg) => Self::Conflict(msg),
            RepositoryError::Storage(msg) => Self::Internal(format!("Storage: {msg}")),
            RepositoryError::Serialization(msg) => {
                Self::Internal(format!("Serialization: {msg}"))
            }
            RepositoryError::Constraint(msg) => Self::BadRequest(msg),
        }
    }
}

impl From<ProviderError> for HttpError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::NotConfigured(_) => Self::ProviderNotConfigured(err.to_string()),
            other => Self::BadGateway(other.to_string()),
        }
    }
}
