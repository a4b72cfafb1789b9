//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

use platform::{ApiEndpoints, HttpClientConfig};

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Backend endpoints (only the token path is used here)
    pub endpoints: ApiEndpoints,
    /// HTTP client settings for the credential exchange
    pub http: HttpClientConfig,
    /// Upper bound for one credential exchange round trip
    pub login_timeout: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            endpoints: ApiEndpoints::default(),
            http: HttpClientConfig::default(),
            login_timeout: Duration::from_secs(15),
        }
    }
}

impl AuthConfig {
    /// Create config for a local development backend
    pub fn development() -> Self {
        Self {
            http: HttpClientConfig::development(),
            login_timeout: Duration::from_secs(5),
            ..Default::default()
        }
    }

    /// Same settings, different backend root
    pub fn with_endpoints(self, endpoints: ApiEndpoints) -> Self {
        Self { endpoints, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AuthConfig::default();
        assert_eq!(config.login_timeout, Duration::from_secs(15));
        assert_eq!(
            config.endpoints.token_url().unwrap().as_str(),
            "http://localhost:8000/token"
        );
    }

    #[test]
    fn test_development_config() {
        let config = AuthConfig::development();
        assert!(config.login_timeout < AuthConfig::default().login_timeout);
    }

    #[test]
    fn test_with_endpoints() {
        let endpoints = ApiEndpoints::new("http://10.0.0.5:9000").unwrap();
        let config = AuthConfig::development().with_endpoints(endpoints);
        assert_eq!(
            config.endpoints.token_url().unwrap().as_str(),
            "http://10.0.0.5:9000/token"
        );
    }
}
