//! Endpoint and HTTP client configuration

use std::time::Duration;

use reqwest::Url;

use crate::client::HttpError;

/// Default backend location used by local deployments
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/";

/// Paths of the backend collaborators, relative to `base_url`
#[derive(Debug, Clone)]
pub struct ApiEndpoints {
    /// Backend root; always ends with `/` so relative joins keep the prefix
    pub base_url: Url,
    /// Credential exchange (form-encoded username/password)
    pub token_path: String,
    /// Image submission (multipart)
    pub submit_path: String,
    /// Task status collection; the task id is appended as a path segment
    pub task_path: String,
    /// PDF report generation
    pub report_path: String,
}

impl Default for ApiEndpoints {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            token_path: "token".to_string(),
            submit_path: "analyze_image/".to_string(),
            task_path: "tasks/".to_string(),
            report_path: "generate_report/".to_string(),
        }
    }
}

impl ApiEndpoints {
    /// Create endpoints rooted at `base_url` with the default paths
    pub fn new(base_url: &str) -> Result<Self, HttpError> {
        let mut base = base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).map_err(|e| HttpError::InvalidUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(HttpError::InvalidUrl(format!(
                "{} cannot be used as a base URL",
                base_url
            )));
        }
        Ok(Self {
            base_url,
            ..Self::default()
        })
    }

    pub fn token_url(&self) -> Result<Url, HttpError> {
        self.join(&self.token_path)
    }

    pub fn submit_url(&self) -> Result<Url, HttpError> {
        self.join(&self.submit_path)
    }

    pub fn report_url(&self) -> Result<Url, HttpError> {
        self.join(&self.report_path)
    }

    /// Status URL for one task; the id is percent-encoded as a single segment
    ///
    /// `.` and `..` are refused: the URL parser would treat them as dot
    /// segments and silently drop them.
    pub fn task_url(&self, task_id: &str) -> Result<Url, HttpError> {
        if matches!(task_id, "" | "." | "..") {
            return Err(HttpError::InvalidUrl(format!(
                "{:?} is not a usable task id",
                task_id
            )));
        }
        let mut url = self.join(&self.task_path)?;
        let shown = url.to_string();
        url.path_segments_mut()
            .map_err(|_| HttpError::InvalidUrl(format!("{} cannot carry path segments", shown)))?
            .pop_if_empty()
            .push(task_id);
        Ok(url)
    }

    fn join(&self, path: &str) -> Result<Url, HttpError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| HttpError::InvalidUrl(e.to_string()))
    }
}

/// HTTP client configuration shared by every gateway
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// TCP connect timeout
    pub connect_timeout: Duration,
    /// Whole-request timeout (headers and body)
    pub request_timeout: Duration,
    /// User-Agent header value
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(30),
            user_agent: format!("encroach-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Short timeouts for local development backends
    pub fn development() -> Self {
        Self {
            connect_timeout: Duration::from_secs(2),
            request_timeout: Duration::from_secs(10),
            ..Default::default()
        }
    }
}
