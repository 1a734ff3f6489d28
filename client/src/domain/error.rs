//! Domain-level error types.
//!
//! Views catch these locally and show [`Error::message`] inline next to the
//! form or list that failed. Nothing is retried or escalated.

use std::fmt;

use super::auth::LoginValidationError;
use super::book::BookValidationError;
use super::ports::{AuthenticatorError, LocalStorageError, RemoteError};
use super::user::UserValidationError;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorCode {
    /// Client-side validation blocked the request before it was sent.
    InvalidRequest,
    /// The server rejected the credentials or the bearer token.
    Unauthorized,
    /// The requested resource does not exist.
    NotFound,
    /// The server answered with another error status.
    Rejected,
    /// The request never produced a response.
    Transport,
    /// The response body did not match the expected shape.
    Decode,
    /// Local storage could not be read or written.
    Storage,
}

impl ErrorCode {
    fn fallback_message(self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid request",
            Self::Unauthorized => "not authorised",
            Self::NotFound => "not found",
            Self::Rejected => "request rejected",
            Self::Transport => "network error",
            Self::Decode => "unexpected response",
            Self::Storage => "local storage unavailable",
        }
    }
}

/// Error surfaced to a view.
///
/// ## Invariants
/// - `message` is non-empty once trimmed of whitespace.
///
/// # Examples
/// ```
/// use carbon_client::domain::{Error, ErrorCode};
///
/// let err = Error::new(ErrorCode::NotFound, "Book not found");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// assert_eq!(err.message(), "Book not found");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    code: ErrorCode,
    message: String,
}

impl Error {
    /// Create a new error. A blank message is replaced with a generic one for
    /// the code so the view always has something to show.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            code.fallback_message().to_owned()
        } else {
            message
        };
        Self { code, message }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message shown inline.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Convenience constructor for [`ErrorCode::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Convenience constructor for [`ErrorCode::Unauthorized`].
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::Storage`].
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Storage, message)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Error {}

impl From<RemoteError> for Error {
    fn from(value: RemoteError) -> Self {
        let code = match &value {
            RemoteError::Transport { .. } => ErrorCode::Transport,
            RemoteError::Status { status: 401 | 403 } => ErrorCode::Unauthorized,
            RemoteError::Status { status: 404 } => ErrorCode::NotFound,
            RemoteError::Status { .. } => ErrorCode::Rejected,
            RemoteError::Decode { .. } => ErrorCode::Decode,
        };
        Self::new(code, value.to_string())
    }
}

impl From<AuthenticatorError> for Error {
    fn from(value: AuthenticatorError) -> Self {
        let code = match &value {
            AuthenticatorError::Transport { .. } => ErrorCode::Transport,
            AuthenticatorError::Rejected { .. } => ErrorCode::Unauthorized,
            AuthenticatorError::Decode { .. } => ErrorCode::Decode,
        };
        Self::new(code, value.to_string())
    }
}

impl From<LocalStorageError> for Error {
    fn from(value: LocalStorageError) -> Self {
        Self::storage(value.to_string())
    }
}

impl From<LoginValidationError> for Error {
    fn from(value: LoginValidationError) -> Self {
        Self::invalid_request(value.to_string())
    }
}

impl From<BookValidationError> for Error {
    fn from(value: BookValidationError) -> Self {
        Self::invalid_request(value.to_string())
    }
}

impl From<UserValidationError> for Error {
    fn from(value: UserValidationError) -> Self {
        Self::invalid_request(value.to_string())
    }
}
