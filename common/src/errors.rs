use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::http_client::UpstreamError;

/// Structured error types for the weather service.
///
/// Every upstream failure is classified into exactly one variant. The
/// originating [`UpstreamError`] is kept as the `source` for diagnostics only.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Authorization error: invalid API key")]
    Unauthorized { source: Option<UpstreamError> },

    #[error("City not found: {city}")]
    NotFound {
        city: String,
        source: Option<UpstreamError>,
    },

    #[error("Number of requests to API exceeded")]
    RateLimited { source: Option<UpstreamError> },

    #[error("Network error or timeout: {message}")]
    NetworkError {
        message: String,
        source: Option<UpstreamError>,
    },

    #[error("Unknown API status code: {status}")]
    UnknownUpstreamStatus {
        status: u16,
        source: Option<UpstreamError>,
    },

    #[error("The API returned an empty response for {city}")]
    EmptyResponse { city: String },

    #[error("Error when requesting weather data: {message}")]
    UnexpectedError {
        message: String,
        source: Option<UpstreamError>,
    },
}

/// Stable discriminant of [`AppError`], safe to branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidInput,
    Unauthorized,
    NotFound,
    RateLimited,
    NetworkError,
    UnknownUpstreamStatus,
    EmptyResponse,
    UnexpectedError,
}

#[derive(Serialize)]
struct ErrorResponse {
    timestamp: String,
    status: u16,
    error: String,
    message: String,
}

impl AppError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn empty_response(city: impl Into<String>) -> Self {
        Self::EmptyResponse { city: city.into() }
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::UnexpectedError {
            message: message.into(),
            source: None,
        }
    }

    /// Maps an upstream failure for `city` onto its outward kind.
    pub fn from_upstream(city: &str, err: UpstreamError) -> Self {
        match err {
            UpstreamError::Status { status: 401, .. } => Self::Unauthorized { source: Some(err) },
            UpstreamError::Status { status: 404, .. } => Self::NotFound {
                city: city.to_string(),
                source: Some(err),
            },
            UpstreamError::Status { status: 429, .. } => Self::RateLimited { source: Some(err) },
            UpstreamError::Status { status, .. } => Self::UnknownUpstreamStatus {
                status,
                source: Some(err),
            },
            UpstreamError::Timeout(_) | UpstreamError::Transport(_) => Self::NetworkError {
                message: err.to_string(),
                source: Some(err),
            },
            UpstreamError::Decode(_) => Self::UnexpectedError {
                message: err.to_string(),
                source: Some(err),
            },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::InvalidInput(_) => ErrorKind::InvalidInput,
            AppError::Unauthorized { .. } => ErrorKind::Unauthorized,
            AppError::NotFound { .. } => ErrorKind::NotFound,
            AppError::RateLimited { .. } => ErrorKind::RateLimited,
            AppError::NetworkError { .. } => ErrorKind::NetworkError,
            AppError::UnknownUpstreamStatus { .. } => ErrorKind::UnknownUpstreamStatus,
            AppError::EmptyResponse { .. } => ErrorKind::EmptyResponse,
            AppError::UnexpectedError { .. } => ErrorKind::UnexpectedError,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::UnexpectedError => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            error!(error = ?self, "Unhandled error");
        } else {
            error!(error = %self, "Error in weather service");
        }

        let body = Json(ErrorResponse {
            timestamp: Utc::now().to_rfc3339(),
            status: status.as_u16(),
            error: status.canonical_reason().unwrap_or("Unknown").to_string(),
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}
