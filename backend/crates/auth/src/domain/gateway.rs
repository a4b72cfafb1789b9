//! Gateway Traits
//!
//! Interfaces for the external credential exchange. Implementation is in
//! the infrastructure layer.

use crate::domain::value_object::{bearer_token::BearerToken, credentials::Credentials};
use crate::error::AuthResult;

/// Credential exchange trait
///
/// Trades a username/password pair for a bearer token. Implementations must
/// not retry on their own; the caller decides.
#[trait_variant::make(CredentialExchange: Send)]
pub trait LocalCredentialExchange {
    /// Exchange credentials for a token
    async fn exchange(&self, credentials: &Credentials) -> AuthResult<BearerToken>;
}
