//! Wire DTOs for the analysis backend
//!
//! Conversion into domain types happens here; a single bad record rejects
//! the whole answer so callers never see a partial result set.

use serde::{Deserialize, Serialize};

use crate::domain::entities::{EncroachmentRecord, TaskUpdate};
use crate::domain::geometry::GeometryCodec;
use crate::domain::value_objects::{ReportLink, TaskId, TaskStatus};
use crate::error::{AnalysisError, AnalysisResult};

/// Task ids arrive as strings, some backends send integers
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawTaskId {
    Text(String),
    Number(u64),
}

/// Answer of `POST {base}/analyze_image/`
#[derive(Debug, Deserialize)]
pub struct SubmitResponse {
    pub task_id: RawTaskId,
}

impl SubmitResponse {
    pub fn into_task_id(self) -> AnalysisResult<TaskId> {
        match self.task_id {
            RawTaskId::Text(id) => TaskId::new(id),
            RawTaskId::Number(id) => TaskId::new(id.to_string()),
        }
    }
}

/// One encroachment as it travels on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncroachmentDto {
    #[serde(rename = "type")]
    pub kind: String,
    pub location: String,
    pub affected_area_sq_m: f64,
    #[serde(default)]
    pub nearest_boundary_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<[f64; 4]>,
}

impl TryFrom<EncroachmentDto> for EncroachmentRecord {
    type Error = AnalysisError;

    fn try_from(dto: EncroachmentDto) -> Result<Self, Self::Error> {
        let location = GeometryCodec::decode(&dto.location)?;
        let record = EncroachmentRecord::new(
            dto.kind,
            location,
            dto.affected_area_sq_m,
            dto.nearest_boundary_id,
        )?;
        match dto.bbox {
            Some(bbox) => record.with_bbox(bbox),
            None => Ok(record),
        }
    }
}

impl From<&EncroachmentRecord> for EncroachmentDto {
    fn from(record: &EncroachmentRecord) -> Self {
        Self {
            kind: record.kind().to_string(),
            location: GeometryCodec::encode(record.location()),
            affected_area_sq_m: record.affected_area_sq_m(),
            nearest_boundary_id: record.nearest_boundary_id().map(str::to_string),
            bbox: record.bbox(),
        }
    }
}

/// Answer of `GET {base}/tasks/{task_id}`
#[derive(Debug, Deserialize)]
pub struct TaskStatusResponse {
    pub status: TaskStatus,
    #[serde(default)]
    pub encroachments: Option<Vec<EncroachmentDto>>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl TaskStatusResponse {
    pub fn into_update(self) -> AnalysisResult<TaskUpdate> {
        match self.status {
            TaskStatus::Pending => Ok(TaskUpdate::Pending),
            TaskStatus::Processing => Ok(TaskUpdate::Processing),
            TaskStatus::Completed => {
                let encroachments = self.encroachments.ok_or_else(|| {
                    AnalysisError::MalformedResponse(
                        "completed task without encroachments".to_string(),
                    )
                })?;
                let records = encroachments
                    .into_iter()
                    .map(EncroachmentRecord::try_from)
                    .collect::<AnalysisResult<Vec<_>>>()?;
                Ok(TaskUpdate::Completed(records))
            }
            TaskStatus::Failed => {
                let reason = self
                    .error
                    .or(self.message)
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| "no reason given".to_string());
                Ok(TaskUpdate::Failed(reason))
            }
        }
    }
}

/// Answer of `GET {base}/generate_report/`
#[derive(Debug, Deserialize)]
pub struct ReportResponse {
    #[serde(default)]
    pub report_url: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ReportResponse {
    pub fn into_link(self) -> AnalysisResult<ReportLink> {
        match (self.report_url, self.message) {
            (Some(url), _) => ReportLink::new(url),
            (None, Some(message)) => Err(AnalysisError::AnalysisFailed(message)),
            (None, None) => Err(AnalysisError::MalformedResponse(
                "report answer carries neither report_url nor message".to_string(),
            )),
        }
    }
}
