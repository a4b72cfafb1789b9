//! Credential Value Objects
//!
//! Username / password pair sent to the credential exchange. Validation here
//! only refuses input that can never succeed; the backend owns the password
//! policy.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{AuthError, AuthResult};

/// Maximum accepted username length (in characters)
pub const USERNAME_MAX_LENGTH: usize = 256;

/// Maximum accepted password length (in bytes)
pub const PASSWORD_MAX_LENGTH: usize = 1024;

/// Operator login name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    pub fn new(raw: &str) -> AuthResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AuthError::InvalidUsername(
                "username cannot be empty".to_string(),
            ));
        }
        if trimmed.chars().count() > USERNAME_MAX_LENGTH {
            return Err(AuthError::InvalidUsername(format!(
                "username must be at most {} characters",
                USERNAME_MAX_LENGTH
            )));
        }
        if trimmed.chars().any(char::is_control) {
            return Err(AuthError::InvalidUsername(
                "username cannot contain control characters".to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Clear-text password, held only for the duration of a login
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Password(String);

impl Password {
    /// Passwords are sent verbatim: no trimming, no normalization
    pub fn new(raw: String) -> AuthResult<Self> {
        let mut raw = raw;
        if raw.is_empty() {
            return Err(AuthError::InvalidPassword(
                "password cannot be empty".to_string(),
            ));
        }
        if raw.len() > PASSWORD_MAX_LENGTH {
            raw.zeroize();
            return Err(AuthError::InvalidPassword(format!(
                "password must be at most {} bytes",
                PASSWORD_MAX_LENGTH
            )));
        }
        Ok(Self(raw))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Password").field(&"[REDACTED]").finish()
    }
}

/// Username + password
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: Username,
    pub password: Password,
}

impl Credentials {
    pub fn new(username: &str, password: String) -> AuthResult<Self> {
        Ok(Self {
            username: Username::new(username)?,
            password: Password::new(password)?,
        })
    }
}
