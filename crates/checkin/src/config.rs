//! Configuration management for checkin.
//!
//! Configuration is loaded with figment from defaults, an optional TOML file,
//! and `CHECKIN_`-prefixed environment variables.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Directory name under the platform config dir.
const APP_DIR_NAME: &str = "checkin";

/// Environment variable prefix.
const ENV_PREFIX: &str = "CHECKIN_";

/// Application configuration.
///
/// Loaded from (in order of precedence, highest first):
/// 1. Environment variables (`CHECKIN_ENDPOINT__BASE_URL`, ...)
/// 2. TOML config file at `~/.config/checkin/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Attendance service location.
    pub endpoint: EndpointConfig,
    /// Camera/scanner settings.
    pub scanner: ScannerConfig,
}

/// Where and how the check-in exchange is sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Scheme, host and port of the attendance service.
    pub base_url: String,
    /// Path of the attendance resource.
    pub path: String,
    /// Deadline for a single exchange in milliseconds. 0 disables it.
    pub request_timeout_ms: u64,
}

/// How camera permission is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionMode {
    /// Always granted.
    #[default]
    Granted,
    /// Always denied.
    Denied,
    /// Granted when the configured camera device can be opened.
    Device,
}

/// Scanner-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Permission policy.
    pub permission: PermissionMode,
    /// Camera device checked in `device` mode.
    pub device_path: Option<PathBuf>,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: "http://0.0.0.0:5000".to_string(),
            path: "/api/attendance".to_string(),
            request_timeout_ms: 10_000,
        }
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            permission: PermissionMode::Granted,
            device_path: None,
        }
    }
}

impl Config {
    /// Load configuration from `config_path`, or the default location when
    /// `None`.
    ///
    /// A missing file is not an error; defaults and environment still apply.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(APP_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        self.attendance_url()?;

        if !self.endpoint.path.starts_with('/') {
            return Err(Error::config_validation(format!(
                "endpoint.path must start with '/', got '{}'",
                self.endpoint.path
            )));
        }

        if self.scanner.permission == PermissionMode::Device && self.scanner.device_path.is_none()
        {
            return Err(Error::config_validation(
                "scanner.device_path is required when scanner.permission = \"device\"",
            ));
        }

        Ok(())
    }

    /// Resolve the full attendance URL from `base_url` and `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEndpoint`] if the base URL does not parse or is
    /// not http(s).
    pub fn attendance_url(&self) -> Result<Url> {
        let invalid = |message: String| Error::InvalidEndpoint {
            url: self.endpoint.base_url.clone(),
            message,
        };

        let base = Url::parse(&self.endpoint.base_url).map_err(|e| invalid(e.to_string()))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", base.scheme())));
        }

        base.join(&self.endpoint.path)
            .map_err(|e| invalid(e.to_string()))
    }

    /// Exchange deadline, if any.
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        match self.endpoint.request_timeout_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }
}
