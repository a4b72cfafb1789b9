//! Bearer Token Value Object
//!
//! Opaque credential presented on each authorized request.
//!
//! ## Invariants
//! - Non-empty after trimming
//! - No whitespace or control characters (must fit in an `Authorization` header)
//! - Never printed: `Debug` and `Display` are redacted
//! - Zeroized when dropped

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{AuthError, AuthResult};

/// Bearer token issued by the credential exchange
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct BearerToken(String);

impl BearerToken {
    /// Create a token, validating that it can be sent as a header value
    pub fn new(raw: impl Into<String>) -> AuthResult<Self> {
        let mut raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            raw.zeroize();
            return Err(AuthError::InvalidToken("token is empty".to_string()));
        }
        if trimmed
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || !c.is_ascii())
        {
            raw.zeroize();
            return Err(AuthError::InvalidToken(
                "token contains characters not allowed in a header".to_string(),
            ));
        }
        let token = Self(trimmed.to_string());
        raw.zeroize();
        Ok(token)
    }

    /// Raw token value, for building the `Authorization` header
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BearerToken").field(&"[REDACTED]").finish()
    }
}

impl fmt::Display for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}
