//! Error types for checkin.
//!
//! Check-in outcomes (success, rejection, network failure) are values of
//! [`crate::CheckInResult`], not errors. This module covers everything that
//! stops the client from getting as far as an exchange: configuration,
//! navigation, and local I/O.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for checkin operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    /// The attendance endpoint could not be turned into a URL.
    #[error("invalid attendance endpoint '{url}': {message}")]
    InvalidEndpoint {
        /// The offending URL text.
        url: String,
        /// Description of what went wrong.
        message: String,
    },

    // === HTTP Errors ===
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    // === Navigation Errors ===
    /// A navigation request named a screen that is not registered.
    #[error("no screen registered under the name '{name}'")]
    UnknownScreen {
        /// The requested destination name.
        name: String,
    },

    /// The navigation stack cannot pop its root screen.
    #[error("already at the root screen")]
    AtRoot,

    // === Permission Errors ===
    /// Camera permission could not be determined.
    #[error("camera permission check failed for {path}: {source}")]
    PermissionCheck {
        /// Device whose access was checked.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === I/O Errors ===
    /// File system or stream operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for checkin operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a configuration validation error.
    #[must_use]
    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }

    /// Create an unknown screen error.
    #[must_use]
    pub fn unknown_screen(name: impl Into<String>) -> Self {
        Self::UnknownScreen { name: name.into() }
    }

    /// Check if this error came from the navigation layer.
    #[must_use]
    pub fn is_navigation_error(&self) -> bool {
        matches!(self, Self::UnknownScreen { .. } | Self::AtRoot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_screen_display() {
        let err = Error::unknown_screen("Activities");
        assert_eq!(
            err.to_string(),
            "no screen registered under the name 'Activities'"
        );
    }

    #[test]
    fn test_is_navigation_error() {
        assert!(Error::unknown_screen("Messages").is_navigation_error());
        assert!(Error::AtRoot.is_navigation_error());
        assert!(!Error::config_validation("bad").is_navigation_error());
    }

    #[test]
    fn test_config_validation_display() {
        let err = Error::config_validation("path must start with '/'");
        assert!(err.to_string().contains("path must start with '/'"));
    }

    #[test]
    fn test_invalid_endpoint_display() {
        let err = Error::InvalidEndpoint {
            url: "not a url".to_string(),
            message: "relative URL without a base".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("not a url"));
        assert!(msg.contains("relative URL"));
    }

    #[test]
    fn test_permission_check_display() {
        let err = Error::PermissionCheck {
            path: PathBuf::from("/dev/video0"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("/dev/video0"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }
}
