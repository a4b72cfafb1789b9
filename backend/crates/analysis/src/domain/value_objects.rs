//! Domain Value Objects
//!
//! Immutable value types for the analysis domain.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, AnalysisResult, GeometryError};

/// Server-assigned task identifier (opaque)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(raw: impl Into<String>) -> AnalysisResult<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AnalysisError::MalformedResponse(
                "task id is empty".to_string(),
            ));
        }
        // Dot segments would address the task collection, not a task
        if trimmed == "." || trimmed == ".." {
            return Err(AnalysisError::MalformedResponse(format!(
                "task id {:?} is not addressable",
                trimmed
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Task status as reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Processing,
    #[serde(alias = "success")]
    Completed,
    #[serde(alias = "error")]
    Failed,
}

impl TaskStatus {
    pub const fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }
}

/// Geographic point, longitude first
///
/// Always finite, longitude in [-180, 180], latitude in [-90, 90].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    lon: f64,
    lat: f64,
}

impl Coordinates {
    /// Map center used when there is nothing to show
    pub const FALLBACK_CENTER: Coordinates = Coordinates {
        lon: -74.006,
        lat: 40.7128,
    };

    pub fn new(lon: f64, lat: f64) -> Result<Self, GeometryError> {
        if !lon.is_finite() || !lat.is_finite() {
            return Err(GeometryError::Malformed(format!(
                "coordinates must be finite, got ({}, {})",
                lon, lat
            )));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(GeometryError::Malformed(format!(
                "longitude {} outside [-180, 180]",
                lon
            )));
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(GeometryError::Malformed(format!(
                "latitude {} outside [-90, 90]",
                lat
            )));
        }
        Ok(Self { lon, lat })
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// `(longitude, latitude)`
    pub fn pair(&self) -> (f64, f64) {
        (self.lon, self.lat)
    }

    /// `[latitude, longitude]`, the order map libraries expect
    pub fn lat_lon(&self) -> [f64; 2] {
        [self.lat, self.lon]
    }
}

/// Image bytes to submit, never empty
#[derive(Clone)]
pub struct ImagePayload {
    file_name: String,
    bytes: Vec<u8>,
}

impl ImagePayload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> AnalysisResult<Self> {
        if bytes.is_empty() {
            return Err(AnalysisError::Precondition(
                "image payload is empty".to_string(),
            ));
        }
        let file_name = file_name.into();
        let file_name = if file_name.trim().is_empty() {
            "upload".to_string()
        } else {
            file_name
        };
        Ok(Self { file_name, bytes })
    }

    /// Read an image from disk
    pub async fn from_path(path: impl AsRef<Path>) -> AnalysisResult<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            AnalysisError::Precondition(format!("cannot read {}: {}", path.display(), e))
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::new(file_name, bytes)
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// MIME type guessed from the file extension
    pub fn content_type(&self) -> &'static str {
        let ext = Path::new(&self.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("jpg" | "jpeg") => "image/jpeg",
            Some("png") => "image/png",
            Some("tif" | "tiff") => "image/tiff",
            Some("webp") => "image/webp",
            _ => "application/octet-stream",
        }
    }
}

impl fmt::Debug for ImagePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImagePayload")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Location of a rendered report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ReportLink(String);

impl ReportLink {
    pub fn new(raw: impl Into<String>) -> AnalysisResult<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(AnalysisError::MalformedResponse(
                "report_url is empty".to_string(),
            ));
        }
        Ok(Self(raw.trim().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReportLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
