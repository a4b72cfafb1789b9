//! Auth (Authentication) Client Module
//!
//! Clean Architecture structure:
//! - `domain/` - Session entity, credential value objects, gateway traits
//! - `application/` - Login use case and configuration
//! - `infra/` - HTTP implementation of the credential exchange
//!
//! ## Session Model
//! - One [`AuthSession`] per operator, created empty at process start
//! - The token is set on successful login and cleared on logout or when an
//!   authorized call is answered with 401
//! - Other components only ever see a [`SessionHandle`]: they can read the
//!   token and invalidate it, never set it
//! - Token writes are last-write-wins; readers observe the old or the new
//!   token, never a partial value

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::{LoginInput, LoginOutput, LoginUseCase};
pub use domain::entity::auth_session::{AuthSession, SessionHandle};
pub use domain::gateway::CredentialExchange;
pub use domain::value_object::{bearer_token::BearerToken, credentials::Credentials};
pub use error::{AuthError, AuthResult};
pub use infra::http::HttpCredentialExchange;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::infra::dto::*;
}

#[cfg(test)]
mod tests;
