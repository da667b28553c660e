//! Error types for backend calls

use http::StatusCode;
use thiserror::Error;

/// Shown to staff when the backend rejects a form login
pub const LOGIN_FAILED_MESSAGE: &str = "로그인에 실패했습니다. 사용자명과 비밀번호를 확인해주세요.";

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors returned by [`crate::ApiClient`]
///
/// `Authentication` and `Request` display only their message, so a popup can
/// show `err.to_string()` to staff directly.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The backend redirected to its login-error page
    #[error("{message}")]
    Authentication {
        /// User-facing message
        message: String,
    },

    /// The backend answered with a non-success status
    #[error("{message}")]
    Request {
        /// Status of the final response
        status: StatusCode,
        /// Response body text, or a generated message when the body was empty
        message: String,
    },

    /// The request never produced a response
    #[error("HTTP transport failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// A payload could not be encoded or a body could not be decoded
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message
        message: String,
    },

    /// An endpoint could not be resolved against the base URL
    #[error("Invalid URL '{url}': {message}")]
    InvalidUrl {
        /// Offending URL or path
        url: String,
        /// Parser message
        message: String,
    },

    /// The client could not be built from configuration
    #[error("Client configuration error: {message}")]
    Configuration {
        /// Error message
        message: String,
    },
}

impl ClientError {
    /// Login rejection raised for a redirect to the login-error page
    pub fn login_failed() -> Self {
        Self::Authentication {
            message: LOGIN_FAILED_MESSAGE.to_string(),
        }
    }

    /// Non-success status, preferring the server's body text as the message
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = if body.is_empty() {
            format!("API 호출 실패: {}", status.as_u16())
        } else {
            body.to_string()
        };
        Self::Request { status, message }
    }

    /// Whether this is a rejected login
    pub const fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// HTTP status behind the failure, when one was received
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Request { status, .. } => Some(*status),
            Self::Transport(err) => err.status(),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<serde_urlencoded::ser::Error> for ClientError {
    fn from(err: serde_urlencoded::ser::Error) -> Self {
        Self::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<onething_core::Error> for ClientError {
    fn from(err: onething_core::Error) -> Self {
        Self::Configuration {
            message: err.to_string(),
        }
    }
}
