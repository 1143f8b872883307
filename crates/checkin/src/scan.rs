//! Decode events and the scan latch.
//!
//! The latch is a single-slot gate: once a decode event is accepted, further
//! events are refused until the user acknowledges the result of the first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Barcode format reported for codes typed or piped in as text.
pub const TEXT_FORMAT: &str = "qr";

/// A code read by the scanner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanEvent {
    /// Symbology reported by the decoder (e.g. `qr`, `ean13`).
    pub format: String,
    /// Decoded content, forwarded verbatim to the attendance service.
    pub payload: String,
    /// When the code was decoded.
    pub scanned_at: DateTime<Utc>,
}

impl ScanEvent {
    /// Create an event stamped with the current time.
    #[must_use]
    pub fn new(format: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            payload: payload.into(),
            scanned_at: Utc::now(),
        }
    }

    /// Create a QR event from a text payload.
    #[must_use]
    pub fn qr(payload: impl Into<String>) -> Self {
        Self::new(TEXT_FORMAT, payload)
    }
}

/// State of the [`ScanLatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LatchState {
    /// Ready to accept a decode event.
    #[default]
    Idle,
    /// A decode event was accepted and its result is not yet acknowledged.
    AwaitingResult,
}

impl std::fmt::Display for LatchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::AwaitingResult => write!(f, "awaiting_result"),
        }
    }
}

/// Returned when a decode event arrives while the latch is closed.
///
/// Carries the refused event back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatchBusy(pub ScanEvent);

impl std::fmt::Display for LatchBusy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "scan of '{}' ignored: previous result not yet acknowledged",
            self.0.payload
        )
    }
}

impl std::error::Error for LatchBusy {}

/// Single-slot gate serializing decode events.
///
/// There is no timeout: a latch left in [`LatchState::AwaitingResult`] stays
/// there until [`ScanLatch::release`] is called.
#[derive(Debug, Default)]
pub struct ScanLatch {
    state: LatchState,
    accepted: u64,
    refused: u64,
}

impl ScanLatch {
    /// Create an idle latch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> LatchState {
        self.state
    }

    /// Whether a new decode event would be accepted.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.state == LatchState::Idle
    }

    /// Accept `event` if idle, closing the latch.
    ///
    /// # Errors
    ///
    /// Returns [`LatchBusy`] with the event if a previous result is still
    /// unacknowledged.
    pub fn try_accept(&mut self, event: ScanEvent) -> Result<ScanEvent, LatchBusy> {
        match self.state {
            LatchState::Idle => {
                self.state = LatchState::AwaitingResult;
                self.accepted += 1;
                tracing::debug!(format = %event.format, payload = %event.payload, "scan accepted");
                Ok(event)
            }
            LatchState::AwaitingResult => {
                self.refused += 1;
                tracing::debug!(payload = %event.payload, "scan refused, latch closed");
                Err(LatchBusy(event))
            }
        }
    }

    /// Reopen the latch. Releasing an idle latch does nothing.
    pub fn release(&mut self) {
        if self.state == LatchState::AwaitingResult {
            tracing::debug!("latch released");
        }
        self.state = LatchState::Idle;
    }

    /// Number of events accepted since creation.
    #[must_use]
    pub fn accepted_count(&self) -> u64 {
        self.accepted
    }

    /// Number of events refused since creation.
    #[must_use]
    pub fn refused_count(&self) -> u64 {
        self.refused
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_event_qr() {
        let event = ScanEvent::qr("ABC123");
        assert_eq!(event.format, "qr");
        assert_eq!(event.payload, "ABC123");
    }

    #[test]
    fn test_latch_starts_idle() {
        let latch = ScanLatch::new();
        assert_eq!(latch.state(), LatchState::Idle);
        assert!(latch.is_idle());
    }

    #[test]
    fn test_accept_closes_latch() {
        let mut latch = ScanLatch::new();
        let event = latch.try_accept(ScanEvent::qr("ABC123")).unwrap();

        assert_eq!(event.payload, "ABC123");
        assert_eq!(latch.state(), LatchState::AwaitingResult);
        assert_eq!(latch.accepted_count(), 1);
    }

    #[test]
    fn test_second_event_refused_while_awaiting() {
        let mut latch = ScanLatch::new();
        latch.try_accept(ScanEvent::qr("first")).unwrap();

        let LatchBusy(refused) = latch.try_accept(ScanEvent::qr("second")).unwrap_err();
        assert_eq!(refused.payload, "second");
        assert_eq!(latch.state(), LatchState::AwaitingResult);
        assert_eq!(latch.refused_count(), 1);
    }

    #[test]
    fn test_release_reopens() {
        let mut latch = ScanLatch::new();
        latch.try_accept(ScanEvent::qr("first")).unwrap();
        latch.release();

        assert!(latch.is_idle());
        assert!(latch.try_accept(ScanEvent::qr("second")).is_ok());
        assert_eq!(latch.accepted_count(), 2);
    }

    #[test]
    fn test_release_idle_is_noop() {
        let mut latch = ScanLatch::new();
        latch.release();
        assert!(latch.is_idle());
        assert_eq!(latch.accepted_count(), 0);
    }

    #[test]
    fn test_never_two_in_flight() {
        let mut latch = ScanLatch::new();
        let mut in_flight = 0;

        for i in 0..20 {
            if latch.try_accept(ScanEvent::qr(format!("code-{i}"))).is_ok() {
                in_flight += 1;
            }
            assert!(in_flight <= 1);
            if i % 5 == 4 {
                latch.release();
                in_flight = 0;
            }
        }
        assert_eq!(latch.accepted_count(), 4);
        assert_eq!(latch.refused_count(), 16);
    }

    #[test]
    fn test_latch_busy_display() {
        let busy = LatchBusy(ScanEvent::qr("XYZ"));
        assert!(busy.to_string().contains("XYZ"));
    }

    #[test]
    fn test_latch_state_display() {
        assert_eq!(LatchState::Idle.to_string(), "idle");
        assert_eq!(LatchState::AwaitingResult.to_string(), "awaiting_result");
    }
}
