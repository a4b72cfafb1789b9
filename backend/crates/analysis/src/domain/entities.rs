//! Domain Entities
//!
//! Core business entities for the analysis domain.

use chrono::{DateTime, Utc};
use kernel::error::kind::ErrorKind;
use kernel::id::SubmissionId;
use serde::Serialize;

use crate::domain::state::LifecycleState;
use crate::domain::value_objects::{Coordinates, TaskId, TaskStatus};
use crate::error::{AnalysisError, AnalysisResult};

/// One detected structure intruding on a boundary
///
/// Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncroachmentRecord {
    #[serde(rename = "type")]
    kind: String,
    location: Coordinates,
    affected_area_sq_m: f64,
    nearest_boundary_id: Option<String>,
    bbox: Option<[f64; 4]>,
}

impl EncroachmentRecord {
    pub fn new(
        kind: impl Into<String>,
        location: Coordinates,
        affected_area_sq_m: f64,
        nearest_boundary_id: Option<String>,
    ) -> AnalysisResult<Self> {
        let kind = kind.into().trim().to_string();
        if kind.is_empty() {
            return Err(AnalysisError::InvalidRecord(
                "type label is empty".to_string(),
            ));
        }
        if !affected_area_sq_m.is_finite() || affected_area_sq_m < 0.0 {
            return Err(AnalysisError::InvalidRecord(format!(
                "affected area must be a non-negative number, got {}",
                affected_area_sq_m
            )));
        }
        // Blank boundary names carry no information
        let nearest_boundary_id = nearest_boundary_id
            .map(|b| b.trim().to_string())
            .filter(|b| !b.is_empty());

        Ok(Self {
            kind,
            location,
            affected_area_sq_m,
            nearest_boundary_id,
            bbox: None,
        })
    }

    /// Attach the detector's bounding box `[x1, y1, x2, y2]`
    pub fn with_bbox(mut self, bbox: [f64; 4]) -> AnalysisResult<Self> {
        if bbox.iter().any(|v| !v.is_finite()) {
            return Err(AnalysisError::InvalidRecord(
                "bbox contains a non-finite value".to_string(),
            ));
        }
        self.bbox = Some(bbox);
        Ok(self)
    }

    /// Category label ("building", "shed", ...)
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn location(&self) -> Coordinates {
        self.location
    }

    pub fn affected_area_sq_m(&self) -> f64 {
        self.affected_area_sq_m
    }

    pub fn nearest_boundary_id(&self) -> Option<&str> {
        self.nearest_boundary_id.as_deref()
    }

    pub fn bbox(&self) -> Option<[f64; 4]> {
        self.bbox
    }
}

/// Why a task ended in `failed`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskFailure {
    pub kind: ErrorKind,
    pub message: String,
    /// HTTP status when the failure was a non-2xx response
    pub status: Option<u16>,
}

impl From<&AnalysisError> for TaskFailure {
    fn from(err: &AnalysisError) -> Self {
        err.to_failure()
    }
}

/// One poll answer, already validated
#[derive(Debug, Clone, PartialEq)]
pub enum TaskUpdate {
    Pending,
    Processing,
    Completed(Vec<EncroachmentRecord>),
    Failed(String),
}

impl TaskUpdate {
    pub fn status(&self) -> TaskStatus {
        match self {
            TaskUpdate::Pending => TaskStatus::Pending,
            TaskUpdate::Processing => TaskStatus::Processing,
            TaskUpdate::Completed(_) => TaskStatus::Completed,
            TaskUpdate::Failed(_) => TaskStatus::Failed,
        }
    }
}

/// A submitted analysis task
///
/// `result` and `error` are mutually exclusive and only set in a terminal
/// status. Terminal tasks ignore further updates.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisTask {
    pub submission: SubmissionId,
    pub id: TaskId,
    pub status: TaskStatus,
    pub submitted_at: DateTime<Utc>,
    result: Option<Vec<EncroachmentRecord>>,
    error: Option<TaskFailure>,
}

impl AnalysisTask {
    /// Task accepted by the backend, waiting in `pending`
    pub fn new(submission: SubmissionId, id: TaskId) -> Self {
        Self {
            submission,
            id,
            status: TaskStatus::Pending,
            submitted_at: Utc::now(),
            result: None,
            error: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn result(&self) -> Option<&[EncroachmentRecord]> {
        self.result.as_deref()
    }

    pub fn error(&self) -> Option<&TaskFailure> {
        self.error.as_ref()
    }

    /// Apply a poll answer; returns false when the task was already terminal
    pub fn apply(&mut self, update: TaskUpdate) -> bool {
        if self.is_terminal() {
            return false;
        }
        self.status = update.status();
        match update {
            TaskUpdate::Pending | TaskUpdate::Processing => {}
            TaskUpdate::Completed(records) => self.result = Some(records),
            TaskUpdate::Failed(message) => {
                self.error = Some(AnalysisError::AnalysisFailed(message).to_failure())
            }
        }
        true
    }

    /// Terminate with a client-side failure (exhausted retries, 401, bad body)
    pub fn fail(&mut self, failure: TaskFailure) -> bool {
        if self.is_terminal() {
            return false;
        }
        self.status = TaskStatus::Failed;
        self.error = Some(failure);
        true
    }
}

/// Point-in-time view of the lifecycle client
#[derive(Debug, Clone, Serialize)]
pub struct TaskSnapshot {
    pub state: LifecycleState,
    pub submission: Option<SubmissionId>,
    pub task_id: Option<TaskId>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub result: Option<Vec<EncroachmentRecord>>,
    pub error: Option<TaskFailure>,
}

impl TaskSnapshot {
    pub fn idle() -> Self {
        Self {
            state: LifecycleState::Idle,
            submission: None,
            task_id: None,
            submitted_at: None,
            result: None,
            error: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Records of a completed task; `None` in every other state
    pub fn records(&self) -> Option<&[EncroachmentRecord]> {
        match self.state {
            LifecycleState::Completed => self.result.as_deref(),
            _ => None,
        }
    }
}
