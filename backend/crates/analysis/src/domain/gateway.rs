//! Gateway Traits
//!
//! Interface to the remote analysis backend. Implementation is in the
//! infrastructure layer.

use auth::BearerToken;

use crate::domain::entities::{EncroachmentRecord, TaskUpdate};
use crate::domain::value_objects::{ImagePayload, ReportLink, TaskId};
use crate::error::AnalysisResult;

/// Analysis backend trait
///
/// Every call is a single round trip. Implementations never retry and never
/// touch the session; classification of failures is left to the caller.
#[trait_variant::make(AnalysisGateway: Send)]
pub trait LocalAnalysisGateway {
    /// Upload an image, returning the server-assigned task id
    async fn submit(&self, token: &BearerToken, image: &ImagePayload) -> AnalysisResult<TaskId>;

    /// Fetch the current status of a task
    async fn poll(&self, token: &BearerToken, task_id: &TaskId) -> AnalysisResult<TaskUpdate>;

    /// Ask the backend to render a report for a result set
    async fn request_report(
        &self,
        token: &BearerToken,
        records: &[EncroachmentRecord],
    ) -> AnalysisResult<ReportLink>;
}
