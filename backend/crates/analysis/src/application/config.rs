//! Application Configuration
//!
//! Configuration for the analysis application layer.

use std::time::Duration;

use platform::{ApiEndpoints, HttpClientConfig, RetryPolicy};

/// Polling configuration
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Delay between successful polls
    pub interval: Duration,
    /// Upper bound for one status request; exceeding it counts as transient
    pub request_timeout: Duration,
    /// Budget and backoff for consecutive transient failures
    pub retry: RetryPolicy,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            request_timeout: Duration::from_secs(10),
            retry: RetryPolicy::default(),
        }
    }
}

impl PollConfig {
    /// Short cadence for a local backend
    pub fn development() -> Self {
        Self {
            interval: Duration::from_secs(1),
            request_timeout: Duration::from_secs(5),
            retry: RetryPolicy::new(3, 250, 2_000),
        }
    }

    pub fn with_interval(self, interval: Duration) -> Self {
        Self { interval, ..self }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.retry.max_retries = max_retries;
        self
    }
}

/// Analysis crate configuration
#[derive(Debug, Clone, Default)]
pub struct AnalysisConfig {
    pub endpoints: ApiEndpoints,
    pub http: HttpClientConfig,
    pub poll: PollConfig,
}

impl AnalysisConfig {
    pub fn development() -> Self {
        Self {
            endpoints: ApiEndpoints::default(),
            http: HttpClientConfig::development(),
            poll: PollConfig::development(),
        }
    }

    pub fn with_endpoints(self, endpoints: ApiEndpoints) -> Self {
        Self { endpoints, ..self }
    }
}
