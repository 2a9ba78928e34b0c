use juanuru_core::{AppError, NetworkError, StorageError};
use serde::{Deserialize, Serialize};

pub use juanuru_core::MissingFieldPolicy;

/// Marker shown for a field the endpoint did not report.
pub const PLACEHOLDER: &str = "N/A";

/// Shown for a missing field under [`MissingFieldPolicy::Raw`].
pub const RAW_MISSING: &str = "undefined";

/// Current conditions reported by the live data endpoint.
///
/// Either field may be absent; absence is kept as `None` all the way to
/// rendering instead of failing the fetch.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LiveReading {
    /// Air temperature in °C
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    /// Wind speed in m/s
    #[serde(
        default,
        rename = "windspeed",
        skip_serializing_if = "Option::is_none"
    )]
    pub wind_speed: Option<f64>,
}

impl LiveReading {
    pub fn new(temperature: Option<f64>, wind_speed: Option<f64>) -> Self {
        Self {
            temperature,
            wind_speed,
        }
    }

    /// True when at least one field is missing.
    pub fn is_partial(&self) -> bool {
        self.temperature.is_none() || self.wind_speed.is_none()
    }
}

/// Formatting of optional reading values under a [`MissingFieldPolicy`].
pub trait MissingFieldPolicyExt {
    fn display_value(self, value: Option<f64>) -> String;
}

impl MissingFieldPolicyExt for MissingFieldPolicy {
    fn display_value(self, value: Option<f64>) -> String {
        match (value, self) {
            (Some(v), _) => v.to_string(),
            (None, MissingFieldPolicy::Placeholder) => PLACEHOLDER.to_string(),
            (None, MissingFieldPolicy::Raw) => RAW_MISSING.to_string(),
        }
    }
}

/// Why a live fetch produced no fresh reading.
#[derive(Debug, thiserror::Error)]
pub enum LiveError {
    /// The request never got a response.
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    /// The endpoint answered with a non-success status.
    #[error("Live endpoint returned status {status}")]
    HttpStatus { status: u16 },

    /// The body was not a reading.
    #[error("Parse error: {0}")]
    Parse(String),

    /// No earlier reading to fall back to.
    #[error("No cached reading available")]
    CacheMiss,

    #[error("Cache error: {0}")]
    Storage(#[from] StorageError),
}

impl From<serde_json::Error> for LiveError {
    fn from(e: serde_json::Error) -> Self {
        LiveError::Parse(e.to_string())
    }
}

impl From<LiveError> for AppError {
    fn from(e: LiveError) -> Self {
        match e {
            LiveError::Network(n) => AppError::Network(n),
            LiveError::Storage(s) => AppError::Storage(s),
            other => AppError::Other(anyhow::Error::new(other)),
        }
    }
}
