//! Attendance scanner screen.

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::client::CheckInClient;
use crate::notification::{DialogAction, Notification};
use crate::permission::{PermissionGate, PermissionProvider, ScanPermission};
use crate::scan::{LatchBusy, LatchState, ScanEvent, ScanLatch};
use crate::source::ScanFeed;

/// What the screen currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScannerView {
    /// Permission request pending.
    WaitingForPermission,
    /// Camera access refused; nothing else is ever shown.
    PermissionDenied,
    /// Camera live, decode events accepted.
    Scanning,
    /// A result is pending or on screen; "Scan again" is offered.
    AwaitingResult,
}

impl ScannerView {
    /// Text shown for the view.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::WaitingForPermission => "Requesting camera permission...",
            Self::PermissionDenied => "No access to the camera",
            Self::Scanning => "Point the camera at a QR code",
            Self::AwaitingResult => "Scan again",
        }
    }
}

/// Why a decode event was not processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ignored {
    /// Camera permission is not granted.
    ScannerInactive(ScanEvent),
    /// A previous result is still unacknowledged.
    Busy(ScanEvent),
}

/// Outcome of delivering a decode event to the screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeOutcome {
    /// The event was dropped without a network call.
    Ignored(Ignored),
    /// The exchange ran; the dialog must be acknowledged to scan again.
    Completed(Notification),
}

/// Controller for the attendance scanner screen.
///
/// One instance corresponds to one screen lifetime: the permission is asked
/// once, and the latch lives and dies with the screen.
#[derive(Debug)]
pub struct AttendanceScreen {
    gate: PermissionGate,
    latch: ScanLatch,
    client: CheckInClient,
}

impl AttendanceScreen {
    /// Create an unmounted screen.
    #[must_use]
    pub fn new(client: CheckInClient, provider: Box<dyn PermissionProvider>) -> Self {
        Self {
            gate: PermissionGate::new(provider),
            latch: ScanLatch::new(),
            client,
        }
    }

    /// Activate the screen, settling camera permission.
    pub async fn mount(&mut self) -> ScanPermission {
        self.gate.activate().await
    }

    /// Camera permission as currently known.
    #[must_use]
    pub fn permission(&self) -> ScanPermission {
        self.gate.state()
    }

    /// Current latch state.
    #[must_use]
    pub fn latch_state(&self) -> LatchState {
        self.latch.state()
    }

    /// Whether the scanner is rendered at all.
    #[must_use]
    pub fn scanner_rendered(&self) -> bool {
        self.permission().allows_scanning()
    }

    /// Whether a decode event would be accepted right now.
    #[must_use]
    pub fn accepts_scans(&self) -> bool {
        self.scanner_rendered() && self.latch.is_idle()
    }

    /// What the screen shows.
    #[must_use]
    pub fn view(&self) -> ScannerView {
        match (self.permission(), self.latch.state()) {
            (ScanPermission::Unknown, _) => ScannerView::WaitingForPermission,
            (ScanPermission::Denied, _) => ScannerView::PermissionDenied,
            (ScanPermission::Granted, LatchState::Idle) => ScannerView::Scanning,
            (ScanPermission::Granted, LatchState::AwaitingResult) => ScannerView::AwaitingResult,
        }
    }

    /// Deliver a decode event.
    ///
    /// Runs the check-in exchange if the scanner is active and idle. The latch
    /// stays closed after this returns until [`acknowledge`](Self::acknowledge)
    /// or [`scan_again`](Self::scan_again) is called.
    pub async fn on_decode(&mut self, event: ScanEvent, cancel: &CancellationToken) -> DecodeOutcome {
        let event = match self.accept(event) {
            Ok(event) => event,
            Err(ignored) => return DecodeOutcome::Ignored(ignored),
        };

        let result = self
            .client
            .check_in_with_cancel(&event.payload, cancel)
            .await;
        DecodeOutcome::Completed(Notification::for_result(result))
    }

    fn accept(&mut self, event: ScanEvent) -> Result<ScanEvent, Ignored> {
        if !self.scanner_rendered() {
            return Err(Ignored::ScannerInactive(event));
        }
        self.latch
            .try_accept(event)
            .map_err(|LatchBusy(event)| Ignored::Busy(event))
    }

    /// Drop a decode event that arrived while a result is pending.
    fn refuse(&mut self, event: ScanEvent) {
        debug_assert!(!self.latch.is_idle());
        if let Err(LatchBusy(event)) = self.latch.try_accept(event) {
            tracing::debug!(payload = %event.payload, "decode ignored while awaiting result");
        }
    }

    /// Number of decode events that started an exchange.
    #[must_use]
    pub fn accepted_scans(&self) -> u64 {
        self.latch.accepted_count()
    }

    /// Number of decode events refused because a result was pending.
    #[must_use]
    pub fn refused_scans(&self) -> u64 {
        self.latch.refused_count()
    }

    /// Press the dialog button.
    pub fn acknowledge(&mut self, action: DialogAction) {
        tracing::debug!(action = action.label(), "result acknowledged");
        self.latch.release();
    }

    /// Press "Scan again".
    pub fn scan_again(&mut self) {
        self.latch.release();
    }

    /// Feed events from `feed` until it closes or `cancel` fires.
    ///
    /// Each completed exchange is handed to `present`, which shows the dialog
    /// and returns the button the user pressed. Events that arrive while an
    /// exchange is in flight or its dialog is open are refused without a
    /// network call. The feed is signalled ready whenever the latch reopens.
    /// Returns the notifications in order.
    pub async fn run<F>(
        &mut self,
        mut feed: ScanFeed,
        cancel: &CancellationToken,
        mut present: F,
    ) -> Vec<Notification>
    where
        F: FnMut(&Notification) -> DialogAction,
    {
        let mut shown = Vec::new();
        let mut open = true;
        feed.signal_ready();

        while open {
            let event = tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                event = feed.recv() => match event {
                    Some(event) => event,
                    None => break,
                },
            };

            let event = match self.accept(event) {
                Ok(event) => event,
                Err(Ignored::ScannerInactive(_)) => {
                    tracing::warn!("scanner inactive, dropping decode events");
                    break;
                }
                Err(Ignored::Busy(event)) => {
                    tracing::debug!(payload = %event.payload, "decode ignored while busy");
                    continue;
                }
            };

            let client = self.client.clone();
            let exchange = client.check_in_with_cancel(&event.payload, cancel);
            tokio::pin!(exchange);

            let result = loop {
                tokio::select! {
                    result = &mut exchange => break result,
                    arrived = feed.recv(), if open => match arrived {
                        Some(arrived) => self.refuse(arrived),
                        None => open = false,
                    },
                }
            };

            let notification = Notification::for_result(result);
            let action = present(&notification);
            while let Some(arrived) = feed.try_recv() {
                self.refuse(arrived);
            }
            self.acknowledge(action);
            shown.push(notification);
            feed.signal_ready();
        }
        shown
    }
}
