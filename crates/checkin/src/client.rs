//! Attendance check-in client.
//!
//! One accepted scan produces exactly one `POST` of `{"qr_code": ...}` to the
//! attendance endpoint. The outcome is classified, never retried: the user
//! decides whether to scan again.

use std::time::Duration;

use reqwest::{StatusCode, Url};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::error::Result;

/// Request body of the check-in exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CheckInRequest<'a> {
    /// Scanned code, sent verbatim.
    pub qr_code: &'a str,
}

/// Outcome of a single check-in exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum CheckInResult {
    /// The server answered with a 2xx status.
    Success {
        /// Status code received.
        status: u16,
    },
    /// The server answered with any other status.
    Rejected {
        /// Status code received.
        status: u16,
    },
    /// The exchange failed before a status was received.
    NetworkError {
        /// Description of the transport failure.
        message: String,
    },
    /// No answer before the configured deadline.
    Timeout {
        /// The deadline that expired.
        #[serde(with = "duration_ms")]
        after: Duration,
    },
    /// The exchange was abandoned by the user.
    Cancelled,
}

impl CheckInResult {
    /// Classify a received status code.
    #[must_use]
    pub fn from_status(status: StatusCode) -> Self {
        if status.is_success() {
            Self::Success {
                status: status.as_u16(),
            }
        } else {
            Self::Rejected {
                status: status.as_u16(),
            }
        }
    }

    /// Whether attendance was recorded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

mod duration_ms {
    use std::time::Duration;

    use serde::Serializer;

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }
}

/// HTTP client for the attendance endpoint.
#[derive(Debug, Clone)]
pub struct CheckInClient {
    client: reqwest::Client,
    url: Url,
    timeout: Option<Duration>,
}

impl CheckInClient {
    /// Create a client for the given endpoint URL.
    ///
    /// `timeout` bounds each exchange; `None` waits as long as the transport
    /// allows.
    #[must_use]
    pub fn new(url: Url, timeout: Option<Duration>) -> Self {
        Self::with_client(reqwest::Client::new(), url, timeout)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    #[must_use]
    pub fn with_client(client: reqwest::Client, url: Url, timeout: Option<Duration>) -> Self {
        Self {
            client,
            url,
            timeout,
        }
    }

    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured endpoint is not a valid URL or the
    /// HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self> {
        let url = config.attendance_url()?;
        let client = reqwest::Client::builder()
            .user_agent(concat!("checkin/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client, url, config.request_timeout()))
    }

    /// The endpoint this client posts to.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Perform the exchange for `code` without a cancellation handle.
    pub async fn check_in(&self, code: &str) -> CheckInResult {
        self.check_in_with_cancel(code, &CancellationToken::new())
            .await
    }

    /// Perform the exchange for `code`.
    ///
    /// Settles as [`CheckInResult::Cancelled`] if `cancel` fires first and as
    /// [`CheckInResult::Timeout`] if the deadline expires first. A cancelled
    /// request may still have reached the server.
    pub async fn check_in_with_cancel(
        &self,
        code: &str,
        cancel: &CancellationToken,
    ) -> CheckInResult {
        tracing::debug!(url = %self.url, code, "sending check-in");

        let exchange = self.exchange(code);
        let bounded = async {
            match self.timeout {
                Some(after) => tokio::time::timeout(after, exchange)
                    .await
                    .unwrap_or(CheckInResult::Timeout { after }),
                None => exchange.await,
            }
        };

        let result = tokio::select! {
            biased;
            () = cancel.cancelled() => CheckInResult::Cancelled,
            result = bounded => result,
        };

        match &result {
            CheckInResult::Success { status } => {
                tracing::info!(code, status, "attendance recorded");
            }
            CheckInResult::Rejected { status } => {
                tracing::warn!(code, status, "attendance rejected by server");
            }
            CheckInResult::NetworkError { message } => {
                tracing::warn!(code, error = %message, "check-in exchange failed");
            }
            CheckInResult::Timeout { after } => {
                tracing::warn!(code, timeout = ?after, "check-in timed out");
            }
            CheckInResult::Cancelled => {
                tracing::info!(code, "check-in cancelled");
            }
        }
        result
    }

    async fn exchange(&self, code: &str) -> CheckInResult {
        let response = self
            .client
            .post(self.url.clone())
            .json(&CheckInRequest { qr_code: code })
            .send()
            .await;

        match response {
            Ok(response) => CheckInResult::from_status(response.status()),
            Err(e) => CheckInResult::NetworkError {
                message: e.to_string(),
            },
        }
    }
}
