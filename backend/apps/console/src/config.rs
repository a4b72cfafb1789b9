//! Console configuration
//!
//! Read from the process environment (after `.env` is loaded) and argv.

use std::path::PathBuf;
use std::time::Duration;

use analysis::{AnalysisConfig, PollConfig};
use anyhow::{Context, bail};
use auth::AuthConfig;
use platform::{ApiEndpoints, HttpClientConfig};

pub const API_URL: &str = "ENCROACH_API_URL";
pub const USERNAME: &str = "ENCROACH_USERNAME";
pub const PASSWORD: &str = "ENCROACH_PASSWORD";
pub const POLL_INTERVAL_SECS: &str = "ENCROACH_POLL_INTERVAL_SECS";
pub const MAX_POLL_RETRIES: &str = "ENCROACH_MAX_POLL_RETRIES";
pub const REPORT: &str = "ENCROACH_REPORT";

pub struct ConsoleConfig {
    pub endpoints: ApiEndpoints,
    pub http: HttpClientConfig,
    pub poll: PollConfig,
    pub username: String,
    pub password: String,
    /// Request a PDF report after a completed analysis
    pub report: bool,
    pub image: PathBuf,
}

impl ConsoleConfig {
    pub fn from_env(args: impl IntoIterator<Item = String>) -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok(), args)
    }

    /// `lookup` stands in for the environment
    pub fn from_lookup<F>(lookup: F, args: impl IntoIterator<Item = String>) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let Some(image) = args.into_iter().next() else {
            bail!("usage: encroach <image-path>");
        };

        let endpoints = match lookup(API_URL) {
            Some(url) => ApiEndpoints::new(&url).with_context(|| format!("{} is invalid", API_URL))?,
            None => ApiEndpoints::default(),
        };

        let username = lookup(USERNAME).with_context(|| format!("{} must be set", USERNAME))?;
        let password = lookup(PASSWORD).with_context(|| format!("{} must be set", PASSWORD))?;

        let mut poll = PollConfig::default();
        if let Some(raw) = lookup(POLL_INTERVAL_SECS) {
            let secs: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("{} must be a whole number of seconds", POLL_INTERVAL_SECS))?;
            if secs == 0 {
                bail!("{} must be at least 1", POLL_INTERVAL_SECS);
            }
            poll = poll.with_interval(Duration::from_secs(secs));
        }
        if let Some(raw) = lookup(MAX_POLL_RETRIES) {
            let retries: u32 = raw
                .trim()
                .parse()
                .with_context(|| format!("{} must be a non-negative integer", MAX_POLL_RETRIES))?;
            poll = poll.with_max_retries(retries);
        }

        let report = lookup(REPORT).is_some_and(|v| {
            matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
        });

        Ok(Self {
            endpoints,
            http: HttpClientConfig::default(),
            poll,
            username,
            password,
            report,
            image: PathBuf::from(image),
        })
    }

    pub fn auth(&self) -> AuthConfig {
        AuthConfig {
            endpoints: self.endpoints.clone(),
            http: self.http.clone(),
            ..Default::default()
        }
    }

    pub fn analysis(&self) -> AnalysisConfig {
        AnalysisConfig {
            endpoints: self.endpoints.clone(),
            http: self.http.clone(),
            poll: self.poll.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn args(path: &str) -> Vec<String> {
        vec![path.to_string()]
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = ConsoleConfig::from_lookup(
            lookup(&[(USERNAME, "operator"), (PASSWORD, "secret")]),
            args("site.jpg"),
        )
        .unwrap();

        assert_eq!(config.endpoints.base_url.as_str(), "http://localhost:8000/");
        assert_eq!(config.poll.interval, Duration::from_secs(5));
        assert!(!config.report);
        assert_eq!(config.image, PathBuf::from("site.jpg"));
    }

    #[test]
    fn test_overrides() {
        let config = ConsoleConfig::from_lookup(
            lookup(&[
                (API_URL, "https://analysis.example.org/api"),
                (USERNAME, "operator"),
                (PASSWORD, "secret"),
                (POLL_INTERVAL_SECS, "2"),
                (MAX_POLL_RETRIES, "7"),
                (REPORT, "true"),
            ]),
            args("site.jpg"),
        )
        .unwrap();

        assert_eq!(
            config.analysis().endpoints.submit_url().unwrap().as_str(),
            "https://analysis.example.org/api/analyze_image/"
        );
        assert_eq!(config.poll.interval, Duration::from_secs(2));
        assert_eq!(config.poll.retry.max_retries, 7);
        assert!(config.report);
        assert_eq!(
            config.auth().endpoints.token_url().unwrap().as_str(),
            "https://analysis.example.org/api/token"
        );
    }

    #[test]
    fn test_missing_or_invalid_values() {
        let creds = [(USERNAME, "operator"), (PASSWORD, "secret")];

        assert!(ConsoleConfig::from_lookup(lookup(&creds), Vec::new()).is_err());
        assert!(ConsoleConfig::from_lookup(lookup(&[(USERNAME, "operator")]), args("a.jpg")).is_err());

        let mut bad = creds.to_vec();
        bad.push((POLL_INTERVAL_SECS, "0"));
        assert!(ConsoleConfig::from_lookup(lookup(&bad), args("a.jpg")).is_err());

        let mut bad = creds.to_vec();
        bad.push((MAX_POLL_RETRIES, "-1"));
        assert!(ConsoleConfig::from_lookup(lookup(&bad), args("a.jpg")).is_err());

        let mut bad = creds.to_vec();
        bad.push((API_URL, "not a url"));
        assert!(ConsoleConfig::from_lookup(lookup(&bad), args("a.jpg")).is_err());
    }
}
