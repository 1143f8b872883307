//! Result dialogs shown after a check-in exchange.

use serde::Serialize;

use crate::client::CheckInResult;

/// The single button offered by a result dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogAction {
    /// Acknowledge a successful check-in.
    Ok,
    /// Dismiss a failure and scan again.
    Retry,
}

impl DialogAction {
    /// Button label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Retry => "Retry",
        }
    }
}

/// A modal notification for one check-in result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// Dialog title.
    pub title: &'static str,
    /// Dialog body.
    pub message: String,
    /// The acknowledgment button. Pressing it reopens the scan latch.
    pub action: DialogAction,
    /// The result this dialog reports.
    pub result: CheckInResult,
}

impl Notification {
    /// Build the dialog for `result`.
    #[must_use]
    pub fn for_result(result: CheckInResult) -> Self {
        let (title, message, action) = match &result {
            CheckInResult::Success { .. } => {
                ("Success", "Attendance recorded!".to_string(), DialogAction::Ok)
            }
            CheckInResult::Rejected { status } => (
                "Error",
                format!("Unable to record attendance (HTTP {status})"),
                DialogAction::Retry,
            ),
            CheckInResult::NetworkError { .. } => (
                "Error",
                "Unable to reach the attendance server".to_string(),
                DialogAction::Retry,
            ),
            CheckInResult::Timeout { .. } => (
                "Error",
                "Request timed out".to_string(),
                DialogAction::Retry,
            ),
            CheckInResult::Cancelled => (
                "Cancelled",
                "Check-in cancelled".to_string(),
                DialogAction::Retry,
            ),
        };

        Self {
            title,
            message,
            action,
            result,
        }
    }
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} [{}]", self.title, self.message, self.action.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_success_offers_ok() {
        let n = Notification::for_result(CheckInResult::Success { status: 200 });
        assert_eq!(n.title, "Success");
        assert_eq!(n.action, DialogAction::Ok);
        assert_eq!(n.message, "Attendance recorded!");
    }

    #[test]
    fn test_failures_offer_retry() {
        let failures = [
            CheckInResult::Rejected { status: 500 },
            CheckInResult::NetworkError {
                message: "connection refused".to_string(),
            },
            CheckInResult::Timeout {
                after: Duration::from_secs(10),
            },
            CheckInResult::Cancelled,
        ];
        for result in failures {
            assert_eq!(Notification::for_result(result).action, DialogAction::Retry);
        }
    }

    #[test]
    fn test_rejected_mentions_status() {
        let n = Notification::for_result(CheckInResult::Rejected { status: 404 });
        assert!(n.message.contains("404"));
    }

    #[test]
    fn test_display() {
        let n = Notification::for_result(CheckInResult::NetworkError {
            message: "dns".to_string(),
        });
        assert_eq!(
            n.to_string(),
            "Error: Unable to reach the attendance server [Retry]"
        );
    }

    #[test]
    fn test_timeout_message() {
        let n = Notification::for_result(CheckInResult::Timeout {
            after: Duration::from_millis(250),
        });
        assert_eq!(n.to_string(), "Error: Request timed out [Retry]");
        assert_eq!(n.result, CheckInResult::Timeout { after: Duration::from_millis(250) });
    }

    #[test]
    fn test_cancelled_message() {
        let n = Notification::for_result(CheckInResult::Cancelled);
        assert_eq!(n.to_string(), "Cancelled: Check-in cancelled [Retry]");
    }
}
