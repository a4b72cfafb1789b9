//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::HttpError;
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Credential exchange answered with a non-2xx status
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// No bearer token is held by the session
    #[error("Not authenticated")]
    Unauthenticated,

    /// Username rejected before any network call
    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    /// Password rejected before any network call
    #[error("Invalid password: {0}")]
    InvalidPassword(String),

    /// Token issued by the backend is unusable
    #[error("Invalid bearer token: {0}")]
    InvalidToken(String),

    /// Credential exchange could not be reached
    #[error("Credential exchange unavailable: {0}")]
    Transport(#[source] HttpError),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::AuthenticationFailed(_) | AuthError::InvalidToken(_) => {
                ErrorKind::AuthenticationFailed
            }
            AuthError::Unauthenticated => ErrorKind::Unauthenticated,
            AuthError::InvalidUsername(_) | AuthError::InvalidPassword(_) => {
                ErrorKind::Precondition
            }
            AuthError::Transport(_) => ErrorKind::Transport,
            AuthError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        let err = AppError::new(self.kind(), self.to_string());
        match self.kind() {
            ErrorKind::AuthenticationFailed | ErrorKind::Unauthenticated => {
                err.with_action("Please log in again")
            }
            ErrorKind::Precondition => err.with_action("Check the username and password"),
            ErrorKind::Transport => err.with_action("Check that the backend is reachable"),
            _ => err,
        }
    }

    /// Log the error with appropriate level
    pub(crate) fn log(&self) {
        match self {
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::AuthenticationFailed(reason) => {
                tracing::warn!(reason = %reason, "Login rejected");
            }
            AuthError::Transport(e) => {
                tracing::warn!(error = %e, "Credential exchange unreachable");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        err.to_app_error()
    }
}

impl From<HttpError> for AuthError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::Unauthorized(status) => {
                AuthError::AuthenticationFailed(format!("backend responded with {}", status))
            }
            HttpError::Status { status, .. } => {
                AuthError::AuthenticationFailed(format!("backend responded with {}", status))
            }
            HttpError::Decode(msg) => {
                AuthError::AuthenticationFailed(format!("unreadable token response: {}", msg))
            }
            HttpError::InvalidUrl(msg) | HttpError::Build(msg) => AuthError::Internal(msg),
            other => AuthError::Transport(other),
        }
    }
}
