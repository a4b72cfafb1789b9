//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Backend endpoint and HTTP client configuration
//! - HTTP client construction and response classification
//! - Retry budgets with capped exponential backoff

pub mod client;
pub mod config;
pub mod retry;

pub use client::{HttpError, StatusClass};
pub use config::{ApiEndpoints, HttpClientConfig};
pub use retry::{RetryBudget, RetryPolicy};
