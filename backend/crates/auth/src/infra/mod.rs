//! Infrastructure Layer
//!
//! HTTP implementation of the credential exchange.

pub mod dto;
pub mod http;

pub use self::http::HttpCredentialExchange;
