//! Analysis Error Types
//!
//! This module provides analysis-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::HttpError;
use thiserror::Error;

use crate::domain::entities::TaskFailure;
use crate::domain::state::LifecycleState;

/// Analysis-specific result type alias
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Point geometry decoding errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    /// Text is not a single `POINT (<lon> <lat>)` with finite, in-range numbers
    #[error("Malformed geometry: {0}")]
    Malformed(String),

    /// Well-formed tag for a geometry other than a single point
    #[error("Unsupported geometry type: {0}")]
    Unsupported(String),
}

impl GeometryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GeometryError::Malformed(_) => ErrorKind::MalformedGeometry,
            GeometryError::Unsupported(_) => ErrorKind::UnsupportedGeometryType,
        }
    }
}

/// Analysis-specific error variants
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Input rejected before contacting the backend
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// No bearer token held by the session
    #[error("Not authenticated")]
    Unauthenticated,

    /// A non-terminal task already exists
    #[error("A task is already in progress ({0})")]
    TaskInProgress(LifecycleState),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Record violates its invariants (empty type, negative or non-finite area)
    #[error("Invalid encroachment record: {0}")]
    InvalidRecord(String),

    /// Backend answered 2xx with a body we cannot interpret
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Backend reported the analysis itself as failed
    #[error("Analysis failed: {0}")]
    AnalysisFailed(String),

    /// Transient poll failures used up the retry budget
    #[error("Polling gave up after {attempts} consecutive transient failures")]
    PollExhausted { attempts: u32 },

    #[error(transparent)]
    Http(#[from] HttpError),

    /// Superseded by a reset or a newer submission
    #[error("Operation cancelled")]
    Cancelled,

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AnalysisError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AnalysisError::Precondition(_) => ErrorKind::Precondition,
            AnalysisError::Unauthenticated => ErrorKind::Unauthenticated,
            AnalysisError::TaskInProgress(_) => ErrorKind::TaskInProgress,
            AnalysisError::Geometry(e) => e.kind(),
            AnalysisError::InvalidRecord(_) => ErrorKind::InvalidRecord,
            AnalysisError::MalformedResponse(_) => ErrorKind::MalformedResponse,
            AnalysisError::AnalysisFailed(_) => ErrorKind::AnalysisFailed,
            AnalysisError::PollExhausted { .. } => ErrorKind::PollExhausted,
            AnalysisError::Http(e) => e.kind(),
            AnalysisError::Cancelled => ErrorKind::Cancelled,
            AnalysisError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Eligible for a local retry (timeouts, connection errors, 408/429/5xx)
    pub fn is_transient(&self) -> bool {
        matches!(self, AnalysisError::Http(e) if e.is_transient())
    }

    /// Backend rejected the bearer token
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, AnalysisError::Http(e) if e.is_unauthorized())
    }

    /// HTTP status, when the error came from a non-2xx response
    pub fn status(&self) -> Option<u16> {
        match self {
            AnalysisError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Snapshot of this error for a task's terminal state
    pub fn to_failure(&self) -> TaskFailure {
        TaskFailure {
            kind: self.kind(),
            message: self.to_string(),
            status: self.status(),
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        let err = AppError::new(self.kind(), self.to_string());
        match self.kind() {
            ErrorKind::Unauthenticated => err.with_action("Please log in again"),
            ErrorKind::TaskInProgress => err.with_action("Wait for the current task or reset it"),
            ErrorKind::PollExhausted | ErrorKind::Transport => {
                err.with_action("Check that the backend is reachable")
            }
            _ => err,
        }
    }

    /// Log the error with appropriate level
    pub(crate) fn log(&self) {
        match self {
            AnalysisError::Internal(msg) => {
                tracing::error!(message = %msg, "Analysis internal error");
            }
            AnalysisError::PollExhausted { attempts } => {
                tracing::error!(attempts, "Polling exhausted");
            }
            AnalysisError::AnalysisFailed(reason) => {
                tracing::error!(reason = %reason, "Backend reported analysis failure");
            }
            AnalysisError::Http(e) if e.is_unauthorized() => {
                tracing::warn!(error = %e, "Backend rejected bearer token");
            }
            AnalysisError::Http(e) => {
                tracing::warn!(error = %e, status = ?e.status(), "Backend request failed");
            }
            AnalysisError::Geometry(_)
            | AnalysisError::InvalidRecord(_)
            | AnalysisError::MalformedResponse(_) => {
                tracing::warn!(error = %self, "Unusable task result");
            }
            _ => {
                tracing::debug!(error = %self, "Analysis error");
            }
        }
    }
}

impl From<AnalysisError> for AppError {
    fn from(err: AnalysisError) -> Self {
        err.to_app_error()
    }
}
