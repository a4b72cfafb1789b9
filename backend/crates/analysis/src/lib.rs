//! Analysis (Encroachment Detection) Client Module
//!
//! Clean Architecture structure:
//! - `domain/` - Records, tasks, lifecycle state machine, point codec, gateway traits
//! - `application/` - Task lifecycle controller, report use case, configuration
//! - `infra/` - HTTP implementation of the analysis gateway
//! - `presentation/` - Map and table projections of finished results
//!
//! ## Task Model
//! - One task per session; a second submit while one is in flight is refused
//! - Polling runs in the background until the task is terminal or reset
//! - Transient poll failures are retried with capped backoff against a budget
//! - A 401 anywhere invalidates the shared auth session
//! - Results are all-or-nothing: one bad record fails the whole task

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::{AnalysisConfig, PollConfig, RequestReportUseCase, TaskLifecycleClient};
pub use domain::entities::{
    AnalysisTask, EncroachmentRecord, TaskFailure, TaskSnapshot, TaskUpdate,
};
pub use domain::gateway::AnalysisGateway;
pub use domain::geometry::GeometryCodec;
pub use domain::state::LifecycleState;
pub use domain::value_objects::{Coordinates, ImagePayload, ReportLink, TaskId, TaskStatus};
pub use error::{AnalysisError, AnalysisResult, GeometryError};
pub use infra::http::HttpAnalysisGateway;
pub use presentation::presenter::ResultPresenter;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::entities::*;
    pub use crate::domain::value_objects::*;
    pub use crate::infra::dto::*;
    pub use crate::presentation::presenter::{MapMarker, MapView, TableRow};
}
