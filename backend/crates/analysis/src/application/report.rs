//! Request Report Use Case
//!
//! Asks the backend to render a report for a completed result set.

use std::sync::Arc;

use auth::SessionHandle;

use crate::domain::entities::TaskSnapshot;
use crate::domain::gateway::AnalysisGateway;
use crate::domain::value_objects::ReportLink;
use crate::error::{AnalysisError, AnalysisResult};

/// Request report use case
pub struct RequestReportUseCase<G>
where
    G: AnalysisGateway,
{
    gateway: Arc<G>,
    session: SessionHandle,
}

impl<G> RequestReportUseCase<G>
where
    G: AnalysisGateway,
{
    pub fn new(gateway: Arc<G>, session: SessionHandle) -> Self {
        Self { gateway, session }
    }

    pub async fn execute(&self, snapshot: &TaskSnapshot) -> AnalysisResult<ReportLink> {
        let records = snapshot.records().ok_or_else(|| {
            AnalysisError::Precondition(format!(
                "reports need a completed task, current state is {}",
                snapshot.state
            ))
        })?;
        let token = self
            .session
            .current_token()
            .ok_or(AnalysisError::Unauthenticated)?;

        match self.gateway.request_report(&token, records).await {
            Ok(link) => {
                tracing::info!(
                    task_id = ?snapshot.task_id.as_ref().map(|t| t.as_str()),
                    records = records.len(),
                    report_url = %link,
                    "Report generated"
                );
                Ok(link)
            }
            Err(err) => {
                if err.is_unauthorized() {
                    self.session.invalidate();
                }
                err.log();
                Err(err)
            }
        }
    }
}
