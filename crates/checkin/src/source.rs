//! Producers of decode events.
//!
//! A [`ScanSource`] stands in for the camera decoder: it pushes
//! [`ScanEvent`]s through a [`ScanSink`] until its input is exhausted or the
//! receiving [`ScanFeed`] goes away.
//!
//! The feed signals when the screen is ready for the next code. Paced sources
//! such as [`ListSource`] and [`LineSource`] wait for that signal before every
//! send, so each code gets its own exchange. A source that ignores it behaves
//! like a live camera: anything it sends while a result is pending is refused.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::{mpsc, Notify};

use crate::error::Result;
use crate::scan::ScanEvent;

/// Create a connected sink/feed pair holding at most `capacity` queued events.
#[must_use]
pub fn scan_channel(capacity: usize) -> (ScanSink, ScanFeed) {
    let (tx, rx) = mpsc::channel(capacity);
    let ready = Arc::new(Notify::new());
    (
        ScanSink {
            tx,
            ready: Arc::clone(&ready),
        },
        ScanFeed { rx, ready },
    )
}

/// Sending half of a [`scan_channel`], held by a [`ScanSource`].
#[derive(Debug, Clone)]
pub struct ScanSink {
    tx: mpsc::Sender<ScanEvent>,
    ready: Arc<Notify>,
}

impl ScanSink {
    /// Wait until the feed is ready for another event.
    ///
    /// Returns `false` if the feed was dropped while waiting.
    pub async fn ready(&self) -> bool {
        tokio::select! {
            biased;
            () = self.tx.closed() => false,
            () = self.ready.notified() => true,
        }
    }

    /// Send `event` without waiting for readiness.
    ///
    /// Returns `false` if the feed was dropped.
    pub async fn send(&self, event: ScanEvent) -> bool {
        self.tx.send(event).await.is_ok()
    }

    /// Wait for readiness, then send `event`.
    ///
    /// Returns `false` if the feed was dropped.
    pub async fn send_when_ready(&self, event: ScanEvent) -> bool {
        self.ready().await && self.send(event).await
    }
}

/// Receiving half of a [`scan_channel`], driven by the scanner screen.
#[derive(Debug)]
pub struct ScanFeed {
    rx: mpsc::Receiver<ScanEvent>,
    ready: Arc<Notify>,
}

impl ScanFeed {
    /// Let a paced source send its next event.
    ///
    /// Signals do not accumulate: at most one is held until a source waits.
    pub fn signal_ready(&self) {
        self.ready.notify_one();
    }

    /// Receive the next event, or `None` once every sink is dropped.
    pub async fn recv(&mut self) -> Option<ScanEvent> {
        self.rx.recv().await
    }

    /// Take an already queued event, if any.
    pub fn try_recv(&mut self) -> Option<ScanEvent> {
        self.rx.try_recv().ok()
    }
}

/// A source of decode events.
#[async_trait]
pub trait ScanSource: Send {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Send events until the input ends or the feed is dropped.
    ///
    /// Returns the number of events sent.
    ///
    /// # Errors
    ///
    /// Returns an error if reading the underlying input fails.
    async fn run(self: Box<Self>, sink: ScanSink) -> Result<u64>;
}

/// Reads one code per line from an async reader.
///
/// Lines are trimmed; blank lines are skipped.
#[derive(Debug)]
pub struct LineSource<R> {
    reader: R,
}

impl<R> LineSource<R> {
    /// Wrap a buffered reader.
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl LineSource<tokio::io::BufReader<tokio::io::Stdin>> {
    /// Read codes from standard input.
    #[must_use]
    pub fn stdin() -> Self {
        Self::new(tokio::io::BufReader::new(tokio::io::stdin()))
    }
}

#[async_trait]
impl<R> ScanSource for LineSource<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    fn name(&self) -> &'static str {
        "lines"
    }

    async fn run(self: Box<Self>, sink: ScanSink) -> Result<u64> {
        let mut lines = self.reader.lines();
        let mut sent = 0;

        while let Some(line) = lines.next_line().await? {
            let code = line.trim();
            if code.is_empty() {
                continue;
            }
            if !sink.send_when_ready(ScanEvent::qr(code)).await {
                tracing::debug!("scan feed closed, stopping line source");
                break;
            }
            sent += 1;
        }
        Ok(sent)
    }
}

/// Replays a fixed list of codes.
#[derive(Debug, Clone)]
pub struct ListSource {
    codes: Vec<String>,
}

impl ListSource {
    /// Create a source over `codes`, in order.
    #[must_use]
    pub fn new(codes: Vec<String>) -> Self {
        Self { codes }
    }
}

#[async_trait]
impl ScanSource for ListSource {
    fn name(&self) -> &'static str {
        "list"
    }

    async fn run(self: Box<Self>, sink: ScanSink) -> Result<u64> {
        let mut sent = 0;
        for code in self.codes {
            if !sink.send_when_ready(ScanEvent::qr(code)).await {
                break;
            }
            sent += 1;
        }
        Ok(sent)
    }
}
