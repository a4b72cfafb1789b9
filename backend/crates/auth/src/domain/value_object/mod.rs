//! Value Object Module

pub mod bearer_token;
pub mod credentials;
