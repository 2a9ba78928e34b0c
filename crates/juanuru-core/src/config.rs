use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::ConfigError;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// How a reading field that the endpoint did not report is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MissingFieldPolicy {
    /// Show the `N/A` marker.
    #[default]
    Placeholder,
    /// Show the missing value the way a browser prints it (`undefined`).
    ///
    /// An explicit JSON `null` counts as missing too, so it also shows
    /// `undefined`.
    Raw,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Live data widget settings
    #[serde(default)]
    pub live: LiveConfig,

    /// Where persisted state (the cache slot) lives
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub share: ShareConfig,

    #[serde(default)]
    pub cost: CostConfig,

    /// External capabilities (clipboard, speech input)
    #[serde(default)]
    pub devices: DeviceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveConfig {
    /// Origin serving the live data endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the live data endpoint, queried with `lat` and `lon`
    #[serde(default = "default_endpoint_path")]
    pub endpoint_path: String,

    /// Storage key of the last-known-good reading
    #[serde(default = "default_cache_key")]
    pub cache_key: String,

    /// Treat non-2xx responses as failures
    #[serde(default = "default_true")]
    pub require_success_status: bool,

    /// Render the cached reading when a fetch fails
    #[serde(default = "default_true")]
    pub cache_fallback: bool,

    #[serde(default)]
    pub missing_field_policy: MissingFieldPolicy,

    /// Request timeout; unset means the request may wait indefinitely
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,

    /// Extra attempts after a transient failure (0 = single request)
    #[serde(default)]
    pub max_retries: u32,

    /// Pause between attempts
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_endpoint_path() -> String {
    "/live".to_string()
}

fn default_cache_key() -> String {
    "lastLiveData".to_string()
}

fn default_true() -> bool {
    true
}

fn default_retry_delay_ms() -> u64 {
    2000
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            endpoint_path: default_endpoint_path(),
            cache_key: default_cache_key(),
            require_success_status: true,
            cache_fallback: true,
            missing_field_policy: MissingFieldPolicy::Placeholder,
            request_timeout_secs: None,
            max_retries: 0,
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the persisted cache slot
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("juanuru")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareConfig {
    /// Name signed at the end of the share text
    #[serde(default = "default_app_name")]
    pub app_name: String,
}

fn default_app_name() -> String {
    "JuaNuru".to_string()
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostConfig {
    /// Monthly cost per unit of system size
    #[serde(default = "default_rate_per_kw")]
    pub rate_per_kw: f64,
}

fn default_rate_per_kw() -> f64 {
    5.0
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            rate_per_kw: default_rate_per_kw(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Command receiving the share text on stdin (e.g. `["wl-copy"]`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clipboard_command: Option<Vec<String>>,

    /// Command printing recognized speech on stdout, one result per line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speech_command: Option<Vec<String>>,
}

impl Config {
    /// Load configuration from the default location, creating it if it doesn't exist
    ///
    /// # Errors
    /// Fails when the config directory is unavailable or the file cannot be
    /// read, parsed, or created.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let config = Self::default();
            config.save_to(&config_path)?;
            tracing::info!("Wrote default config to {}", config_path.display());
            return Ok(config);
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit file
    ///
    /// # Errors
    /// Fails when the file cannot be read or is not valid TOML for `Config`.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns an error if validation fails with critical errors; warnings
    /// are logged.
    ///
    /// # Errors
    /// `ConfigError::Invalid` when the file cannot be loaded or validation
    /// reports errors.
    pub fn load_validated(path: Option<&Path>) -> Result<(Self, ValidationResult), ConfigError> {
        let loaded = match path {
            Some(p) => Self::load_from(p),
            None => Self::load(),
        };
        let config = loaded.map_err(|e| ConfigError::Invalid(format!("{:#}", e)))?;
        let validation = config.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()));
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.live.base_url, "live.base_url", &mut result);

        if !self.live.endpoint_path.starts_with('/') {
            result.add_error("live.endpoint_path", "Endpoint path must start with '/'");
        }

        if self.live.cache_key.trim().is_empty() {
            result.add_error("live.cache_key", "Cache key cannot be empty");
        } else if self.live.cache_key.contains(['/', '\\']) {
            result.add_error("live.cache_key", "Cache key cannot contain path separators");
        }

        if self.live.request_timeout_secs == Some(0) {
            result.add_error(
                "live.request_timeout_secs",
                "Timeout must be greater than 0 (omit it to disable)",
            );
        }

        if self.live.max_retries > 10 {
            result.add_warning("live.max_retries", "More than 10 retries per fetch");
        }

        if !self.live.cache_fallback {
            result.add_warning(
                "live.cache_fallback",
                "Cache fallback disabled - failed fetches show no data",
            );
        }

        if !self.cost.rate_per_kw.is_finite() {
            result.add_error("cost.rate_per_kw", "Rate must be a finite number");
        } else if self.cost.rate_per_kw <= 0.0 {
            result.add_warning("cost.rate_per_kw", "Rate is zero or negative");
        }

        if self.share.app_name.trim().is_empty() {
            result.add_warning("share.app_name", "App name is empty");
        }

        for (field, command) in [
            ("devices.clipboard_command", &self.devices.clipboard_command),
            ("devices.speech_command", &self.devices.speech_command),
        ] {
            if matches!(command, Some(argv) if argv.is_empty()) {
                result.add_error(field, "Command must name a program");
            }
        }

        result
    }

    /// Validate a URL field
    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }

                if url.port() == Some(0) {
                    result.add_error(field_name, "Port cannot be 0");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to the given file
    ///
    /// # Errors
    /// Fails when the parent directory cannot be created or the file written.
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(config_path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the default configuration file
    ///
    /// # Errors
    /// Fails when the platform has no config directory.
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("juanuru");

        Ok(config_dir.join("config.toml"))
    }
}
