//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Domain entities (EncroachmentRecord, AnalysisTask, TaskSnapshot)
//! - Domain value objects (TaskId, TaskStatus, Coordinates, ImagePayload)
//! - The lifecycle state machine
//! - The point geometry codec
//! - Gateway traits (interfaces)

pub mod entities;
pub mod gateway;
pub mod geometry;
pub mod state;
pub mod value_objects;

pub use gateway::AnalysisGateway;
pub use geometry::GeometryCodec;
pub use state::LifecycleState;
