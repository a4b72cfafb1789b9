//! Infrastructure Layer
//!
//! HTTP implementation of the analysis gateway.

pub mod dto;
pub mod http;

pub use self::http::HttpAnalysisGateway;
