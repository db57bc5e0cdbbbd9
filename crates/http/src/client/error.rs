//! Client error types

use crate::types::ErrorBody;
use thiserror::Error;

/// Client error types
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or request error
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error status
    #[error("Server error {status}: {message}")]
    ServerError { status: u16, message: String },

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Bad request
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Forbidden
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Reading or writing persisted session state failed
    #[error("Session storage failed: {0}")]
    Storage(#[from] calltrack_core::CoreError),

    /// No access token is stored
    #[error("No valid access token")]
    AuthAbsent,

    /// The refresh round-trip failed and the session was wiped
    #[error("Session expired and could not be refreshed")]
    AuthExpiredUnrecoverable,

    /// The request was abandoned before it completed
    #[error("Request cancelled")]
    Cancelled,
}

impl ClientError {
    /// Create error from HTTP status code and raw response body
    ///
    /// A JSON `{"message": ...}` body is unwrapped; anything else is used as-is,
    /// falling back to the status text for empty bodies.
    pub fn from_status(status: reqwest::StatusCode, body: String) -> Self {
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|parsed| parsed.message)
            .unwrap_or(body);
        let message = if message.trim().is_empty() {
            status.to_string()
        } else {
            message
        };

        match status.as_u16() {
            400 => Self::BadRequest(message),
            401 => Self::AuthenticationFailed(message),
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            _ => Self::ServerError {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// Errors that must send the user back to the login screen
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            Self::AuthenticationFailed(_) | Self::AuthAbsent | Self::AuthExpiredUnrecoverable
        )
    }

    /// HTTP status carried by the error, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::BadRequest(_) => Some(400),
            Self::AuthenticationFailed(_) => Some(401),
            Self::Forbidden(_) => Some(403),
            Self::NotFound(_) => Some(404),
            Self::ServerError { status, .. } => Some(*status),
            Self::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
