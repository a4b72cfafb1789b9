//! Domain Layer
//!
//! Contains the session entity, credential value objects, and gateway traits.

pub mod entity;
pub mod gateway;
pub mod value_object;

// Re-exports
pub use entity::auth_session::{AuthSession, SessionHandle};
pub use gateway::CredentialExchange;
