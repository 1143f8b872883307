//! Camera permission gate.
//!
//! The gate asks a [`PermissionProvider`] once per screen lifetime and then
//! keeps the answer. Only [`ScanPermission::Granted`] lets the scanner run.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::Serialize;

use crate::config::{PermissionMode, ScannerConfig};
use crate::error::{Error, Result};

/// Camera permission as seen by the attendance screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanPermission {
    /// Not yet asked.
    #[default]
    Unknown,
    /// Camera may be used.
    Granted,
    /// Camera may not be used.
    Denied,
}

impl ScanPermission {
    /// Whether the scanner may be active in this state.
    #[must_use]
    pub fn allows_scanning(self) -> bool {
        self == Self::Granted
    }
}

impl std::fmt::Display for ScanPermission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::Granted => write!(f, "granted"),
            Self::Denied => write!(f, "denied"),
        }
    }
}

/// A platform collaborator that can be asked for camera access.
#[async_trait]
pub trait PermissionProvider: Send + Sync + std::fmt::Debug {
    /// Ask for camera access.
    ///
    /// Must return `Granted` or `Denied`, never `Unknown`.
    ///
    /// # Errors
    ///
    /// Returns an error if the permission could not be determined at all.
    async fn request(&self) -> Result<ScanPermission>;
}

/// Provider with a fixed answer.
#[derive(Debug, Clone, Copy)]
pub struct FixedPermission {
    granted: bool,
}

impl FixedPermission {
    /// Always grant.
    #[must_use]
    pub fn granted() -> Self {
        Self { granted: true }
    }

    /// Always deny.
    #[must_use]
    pub fn denied() -> Self {
        Self { granted: false }
    }
}

#[async_trait]
impl PermissionProvider for FixedPermission {
    async fn request(&self) -> Result<ScanPermission> {
        Ok(if self.granted {
            ScanPermission::Granted
        } else {
            ScanPermission::Denied
        })
    }
}

/// Provider that grants access when a camera device can be opened.
#[derive(Debug, Clone)]
pub struct DevicePermission {
    path: PathBuf,
}

impl DevicePermission {
    /// Check access to the given device node (e.g. `/dev/video0`).
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PermissionProvider for DevicePermission {
    async fn request(&self) -> Result<ScanPermission> {
        match tokio::fs::File::open(&self.path).await {
            Ok(_) => Ok(ScanPermission::Granted),
            Err(e)
                if matches!(
                    e.kind(),
                    std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied
                ) =>
            {
                tracing::info!(path = %self.path.display(), error = %e, "camera not accessible");
                Ok(ScanPermission::Denied)
            }
            Err(source) => Err(Error::PermissionCheck {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

/// Build the provider described by the scanner configuration.
#[must_use]
pub fn provider_from_config(config: &ScannerConfig) -> Box<dyn PermissionProvider> {
    match (config.permission, &config.device_path) {
        (PermissionMode::Granted, _) => Box::new(FixedPermission::granted()),
        (PermissionMode::Denied, _) => Box::new(FixedPermission::denied()),
        (PermissionMode::Device, Some(path)) => Box::new(DevicePermission::new(path.clone())),
        // Validation rejects this combination; fail closed if it slips through.
        (PermissionMode::Device, None) => Box::new(FixedPermission::denied()),
    }
}

/// One-shot permission state machine: Unknown → Granted | Denied.
#[derive(Debug)]
pub struct PermissionGate {
    provider: Box<dyn PermissionProvider>,
    state: ScanPermission,
}

impl PermissionGate {
    /// Create a gate in the `Unknown` state.
    #[must_use]
    pub fn new(provider: Box<dyn PermissionProvider>) -> Self {
        Self {
            provider,
            state: ScanPermission::Unknown,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> ScanPermission {
        self.state
    }

    /// Ask the provider, once. Later calls return the settled state.
    ///
    /// A provider error or an `Unknown` answer settles the gate as `Denied`.
    pub async fn activate(&mut self) -> ScanPermission {
        if self.state != ScanPermission::Unknown {
            return self.state;
        }

        self.state = match self.provider.request().await {
            Ok(ScanPermission::Granted) => ScanPermission::Granted,
            Ok(_) => ScanPermission::Denied,
            Err(e) => {
                tracing::warn!(error = %e, "camera permission check failed, treating as denied");
                ScanPermission::Denied
            }
        };
        tracing::debug!(permission = %self.state, "camera permission settled");
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Debug)]
    struct CountingProvider {
        answer: ScanPermission,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl PermissionProvider for CountingProvider {
        async fn request(&self) -> Result<ScanPermission> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.answer)
        }
    }

    #[derive(Debug)]
    struct FailingProvider;

    #[async_trait]
    impl PermissionProvider for FailingProvider {
        async fn request(&self) -> Result<ScanPermission> {
            Err(Error::Io(std::io::Error::other("camera service crashed")))
        }
    }

    #[test]
    fn test_only_granted_allows_scanning() {
        assert!(!ScanPermission::Unknown.allows_scanning());
        assert!(ScanPermission::Granted.allows_scanning());
        assert!(!ScanPermission::Denied.allows_scanning());
    }

    #[tokio::test]
    async fn test_gate_starts_unknown() {
        let gate = PermissionGate::new(Box::new(FixedPermission::granted()));
        assert_eq!(gate.state(), ScanPermission::Unknown);
    }

    #[tokio::test]
    async fn test_gate_asks_exactly_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut gate = PermissionGate::new(Box::new(CountingProvider {
            answer: ScanPermission::Granted,
            calls: Arc::clone(&calls),
        }));

        assert_eq!(gate.activate().await, ScanPermission::Granted);
        assert_eq!(gate.activate().await, ScanPermission::Granted);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_denied_is_terminal() {
        let mut gate = PermissionGate::new(Box::new(FixedPermission::denied()));
        assert_eq!(gate.activate().await, ScanPermission::Denied);
        assert_eq!(gate.activate().await, ScanPermission::Denied);
    }

    #[tokio::test]
    async fn test_unknown_answer_settles_denied() {
        let mut gate = PermissionGate::new(Box::new(CountingProvider {
            answer: ScanPermission::Unknown,
            calls: Arc::new(AtomicUsize::new(0)),
        }));
        assert_eq!(gate.activate().await, ScanPermission::Denied);
    }

    #[tokio::test]
    async fn test_provider_error_settles_denied() {
        let mut gate = PermissionGate::new(Box::new(FailingProvider));
        assert_eq!(gate.activate().await, ScanPermission::Denied);
    }

    #[tokio::test]
    async fn test_device_permission_missing_device() {
        let provider = DevicePermission::new("/nonexistent/video99");
        assert_eq!(provider.request().await.unwrap(), ScanPermission::Denied);
    }

    #[tokio::test]
    async fn test_device_permission_readable_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let provider = DevicePermission::new(file.path());
        assert_eq!(provider.request().await.unwrap(), ScanPermission::Granted);
    }

    #[tokio::test]
    async fn test_provider_from_config() {
        let mut config = ScannerConfig::default();
        assert_eq!(
            provider_from_config(&config).request().await.unwrap(),
            ScanPermission::Granted
        );

        config.permission = PermissionMode::Denied;
        assert_eq!(
            provider_from_config(&config).request().await.unwrap(),
            ScanPermission::Denied
        );

        config.permission = PermissionMode::Device;
        assert_eq!(
            provider_from_config(&config).request().await.unwrap(),
            ScanPermission::Denied
        );
    }

    #[test]
    fn test_scan_permission_display() {
        assert_eq!(ScanPermission::Unknown.to_string(), "unknown");
        assert_eq!(ScanPermission::Granted.to_string(), "granted");
        assert_eq!(ScanPermission::Denied.to_string(), "denied");
    }
}
