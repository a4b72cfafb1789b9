//! HTTP client utilities
//!
//! Builds the shared `reqwest` client and classifies backend responses so
//! every gateway agrees on what counts as success, auth failure, transient
//! failure, or permanent rejection.

use http::StatusCode;
use kernel::error::{app_error::AppError, kind::ErrorKind};
use serde::de::DeserializeOwned;

use crate::config::HttpClientConfig;

/// Maximum number of response body characters kept in an error
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Coarse classification of an HTTP status code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// 2xx
    Success,
    /// 401: the bearer credential is missing, expired, or revoked
    Unauthorized,
    /// 408, 429, and 5xx: worth retrying later
    Transient,
    /// Any other non-2xx: retrying will not help
    Rejected,
}

impl StatusClass {
    pub fn of(status: StatusCode) -> Self {
        if status.is_success() {
            StatusClass::Success
        } else if status == StatusCode::UNAUTHORIZED {
            StatusClass::Unauthorized
        } else if status == StatusCode::REQUEST_TIMEOUT
            || status == StatusCode::TOO_MANY_REQUESTS
            || status.is_server_error()
        {
            StatusClass::Transient
        } else {
            StatusClass::Rejected
        }
    }
}

/// Error raised while talking to the backend
#[derive(Debug, Clone, thiserror::Error)]
pub enum HttpError {
    #[error("Request timed out")]
    Timeout,

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Backend rejected the credentials ({0})")]
    Unauthorized(StatusCode),

    #[error("Backend responded with {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Response body could not be decoded: {0}")]
    Decode(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Request could not be built: {0}")]
    Build(String),
}

impl HttpError {
    /// Whether the failure is a connectivity problem eligible for retry
    pub fn is_transient(&self) -> bool {
        match self {
            HttpError::Timeout | HttpError::Connect(_) => true,
            HttpError::Status { status, .. } => StatusClass::of(*status) == StatusClass::Transient,
            _ => false,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, HttpError::Unauthorized(_))
    }

    /// HTTP status code, when the failure came from a response
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            HttpError::Unauthorized(status) | HttpError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Get the ErrorKind for this error
    ///
    /// Every non-2xx answer other than 401 is `ServerRejected`, retryable or
    /// not; whether to retry is decided by [`is_transient`](Self::is_transient).
    pub fn kind(&self) -> ErrorKind {
        match self {
            HttpError::Unauthorized(_) => ErrorKind::Unauthenticated,
            HttpError::Status { .. } => ErrorKind::ServerRejected,
            HttpError::Decode(_) => ErrorKind::MalformedResponse,
            HttpError::InvalidUrl(_) | HttpError::Build(_) => ErrorKind::Precondition,
            HttpError::Timeout | HttpError::Connect(_) => ErrorKind::Transport,
        }
    }
}

impl From<reqwest::Error> for HttpError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            HttpError::Timeout
        } else if err.is_connect() || err.is_request() {
            HttpError::Connect(err.to_string())
        } else if err.is_decode() {
            HttpError::Decode(err.to_string())
        } else if err.is_builder() {
            HttpError::Build(err.to_string())
        } else if let Some(status) = err.status() {
            HttpError::Status {
                status,
                body: String::new(),
            }
        } else {
            HttpError::Connect(err.to_string())
        }
    }
}

impl From<HttpError> for AppError {
    fn from(err: HttpError) -> Self {
        AppError::new(err.kind(), err.to_string())
    }
}

/// Build the shared HTTP client
pub fn build_client(config: &HttpClientConfig) -> Result<reqwest::Client, HttpError> {
    reqwest::Client::builder()
        .connect_timeout(config.connect_timeout)
        .timeout(config.request_timeout)
        .user_agent(config.user_agent.clone())
        .build()
        .map_err(|e| HttpError::Build(e.to_string()))
}

/// Turn a non-2xx response into an [`HttpError`], passing 2xx through
pub async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, HttpError> {
    let status = response.status();
    let class = StatusClass::of(status);
    if class != StatusClass::Success {
        tracing::debug!(url = %response.url(), %status, ?class, "Backend returned non-success status");
    }
    match class {
        StatusClass::Success => Ok(response),
        StatusClass::Unauthorized => Err(HttpError::Unauthorized(status)),
        StatusClass::Transient | StatusClass::Rejected => {
            // Body is best-effort context only
            let body = response.text().await.unwrap_or_default();
            Err(HttpError::Status {
                status,
                body: truncate_body(&body),
            })
        }
    }
}

/// Check the status, then decode the JSON body
pub async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, HttpError> {
    let response = check_status(response).await?;
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| HttpError::Decode(e.to_string()))
}

fn truncate_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= MAX_ERROR_BODY_CHARS {
        trimmed.to_string()
    } else {
        let mut cut: String = trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect();
        cut.push('…');
        cut
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_class() {
        assert_eq!(StatusClass::of(StatusCode::OK), StatusClass::Success);
        assert_eq!(StatusClass::of(StatusCode::ACCEPTED), StatusClass::Success);
        assert_eq!(
            StatusClass::of(StatusCode::UNAUTHORIZED),
            StatusClass::Unauthorized
        );
        assert_eq!(
            StatusClass::of(StatusCode::SERVICE_UNAVAILABLE),
            StatusClass::Transient
        );
        assert_eq!(
            StatusClass::of(StatusCode::TOO_MANY_REQUESTS),
            StatusClass::Transient
        );
        assert_eq!(
            StatusClass::of(StatusCode::REQUEST_TIMEOUT),
            StatusClass::Transient
        );
        assert_eq!(
            StatusClass::of(StatusCode::UNPROCESSABLE_ENTITY),
            StatusClass::Rejected
        );
        assert_eq!(StatusClass::of(StatusCode::FORBIDDEN), StatusClass::Rejected);
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(HttpError::Timeout.kind(), ErrorKind::Transport);
        assert_eq!(
            HttpError::Connect("refused".into()).kind(),
            ErrorKind::Transport
        );
        assert_eq!(
            HttpError::Unauthorized(StatusCode::UNAUTHORIZED).kind(),
            ErrorKind::Unauthenticated
        );
        let busy = HttpError::Status {
            status: StatusCode::SERVICE_UNAVAILABLE,
            body: String::new(),
        };
        assert_eq!(busy.kind(), ErrorKind::ServerRejected);
        assert!(busy.is_transient());
        assert_eq!(
            HttpError::Status {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                body: String::new()
            }
            .kind(),
            ErrorKind::ServerRejected
        );
        assert_eq!(
            HttpError::Decode("eof".into()).kind(),
            ErrorKind::MalformedResponse
        );
    }

    #[test]
    fn test_error_status() {
        assert_eq!(HttpError::Timeout.status(), None);
        assert_eq!(
            HttpError::Unauthorized(StatusCode::UNAUTHORIZED).status(),
            Some(StatusCode::UNAUTHORIZED)
        );
    }

    #[test]
    fn test_truncate_body() {
        assert_eq!(truncate_body("  short  "), "short");
        let long = "x".repeat(MAX_ERROR_BODY_CHARS + 10);
        let cut = truncate_body(&long);
        assert_eq!(cut.chars().count(), MAX_ERROR_BODY_CHARS + 1);
        assert!(cut.ends_with('…'));
    }

    #[test]
    fn test_into_app_error() {
        let err: AppError = HttpError::Timeout.into();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(err.is_retryable());
    }

    #[test]
    fn test_build_client() {
        assert!(build_client(&HttpClientConfig::default()).is_ok());
    }
}
