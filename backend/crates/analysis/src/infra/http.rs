//! HTTP Analysis Gateway
//!
//! reqwest implementation of [`AnalysisGateway`]:
//! - `POST {base}/analyze_image/` multipart upload, part `file`
//! - `GET {base}/tasks/{task_id}`
//! - `GET {base}/generate_report/?encroachments_json=...`

use auth::BearerToken;
use platform::client::{build_client, read_json};
use platform::{ApiEndpoints, HttpError};
use reqwest::multipart::{Form, Part};

use crate::application::config::AnalysisConfig;
use crate::domain::entities::{EncroachmentRecord, TaskUpdate};
use crate::domain::gateway::AnalysisGateway;
use crate::domain::value_objects::{ImagePayload, ReportLink, TaskId};
use crate::error::{AnalysisError, AnalysisResult};
use crate::infra::dto::{EncroachmentDto, ReportResponse, SubmitResponse, TaskStatusResponse};

/// reqwest-backed [`AnalysisGateway`]
#[derive(Debug, Clone)]
pub struct HttpAnalysisGateway {
    client: reqwest::Client,
    endpoints: ApiEndpoints,
}

impl HttpAnalysisGateway {
    pub fn new(config: &AnalysisConfig) -> AnalysisResult<Self> {
        let client = build_client(&config.http)?;
        Ok(Self::with_client(client, config.endpoints.clone()))
    }

    /// Share an existing client (connection pool) with other gateways
    pub fn with_client(client: reqwest::Client, endpoints: ApiEndpoints) -> Self {
        Self { client, endpoints }
    }
}

impl AnalysisGateway for HttpAnalysisGateway {
    async fn submit(&self, token: &BearerToken, image: &ImagePayload) -> AnalysisResult<TaskId> {
        let url = self.endpoints.submit_url()?;

        let part = Part::bytes(image.bytes().to_vec())
            .file_name(image.file_name().to_string())
            .mime_str(image.content_type())
            .map_err(HttpError::from)?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(url)
            .bearer_auth(token.expose())
            .multipart(form)
            .send()
            .await
            .map_err(HttpError::from)?;

        let body: SubmitResponse = read_json(response).await?;
        body.into_task_id()
    }

    async fn poll(&self, token: &BearerToken, task_id: &TaskId) -> AnalysisResult<TaskUpdate> {
        let url = self.endpoints.task_url(task_id.as_str())?;

        let response = self
            .client
            .get(url)
            .bearer_auth(token.expose())
            .send()
            .await
            .map_err(HttpError::from)?;

        let body: TaskStatusResponse = read_json(response).await?;
        body.into_update()
    }

    async fn request_report(
        &self,
        token: &BearerToken,
        records: &[EncroachmentRecord],
    ) -> AnalysisResult<ReportLink> {
        let url = self.endpoints.report_url()?;
        let dtos: Vec<EncroachmentDto> = records.iter().map(EncroachmentDto::from).collect();
        let encroachments_json = serde_json::to_string(&dtos)
            .map_err(|e| AnalysisError::Internal(format!("cannot encode records: {}", e)))?;

        let response = self
            .client
            .get(url)
            .bearer_auth(token.expose())
            .query(&[("encroachments_json", encroachments_json)])
            .send()
            .await
            .map_err(HttpError::from)?;

        let body: ReportResponse = read_json(response).await?;
        body.into_link()
    }
}
