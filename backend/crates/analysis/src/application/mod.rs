//! Application Layer - Use Cases
//!
//! This layer orchestrates domain logic and infrastructure.
//! Contains the task lifecycle controller and the report use case.

pub mod config;
pub mod lifecycle;
pub mod report;

pub use config::{AnalysisConfig, PollConfig};
pub use lifecycle::TaskLifecycleClient;
pub use report::RequestReportUseCase;
