use tokio::sync::oneshot;
use tracing::debug;

use crate::audio::CaptureError;

use super::session::{ActiveCapture, CaptureSession, CaptureSummary};

/// Recording toggle state: one full press-pair per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleState {
    Idle,
    Recording,
    /// Terminal — the capture is persisted and further presses are ignored.
    Stopped,
}

/// Drives a [`CaptureSession`] from designated-key presses.
///
/// - `Idle` → `Recording`: launches `begin()` on its own task so the
///   key-listener context is never blocked by stream setup, keeping the
///   readiness signal for the stop transition.
/// - `Recording` → `Stopped`: awaits readiness (a stop can arrive while the
///   stream is still opening), then runs `end()`.
/// - `Stopped` is terminal.
pub struct RecordingToggle {
    state: ToggleState,
    session: Option<CaptureSession>,
    pending: Option<oneshot::Receiver<Result<ActiveCapture, CaptureError>>>,
    summary: Option<CaptureSummary>,
}

impl RecordingToggle {
    pub fn new(session: CaptureSession) -> Self {
        Self {
            state: ToggleState::Idle,
            session: Some(session),
            pending: None,
            summary: None,
        }
    }

    pub fn state(&self) -> ToggleState {
        self.state
    }

    /// Handle one press of the designated key.
    pub async fn press(&mut self) -> Result<ToggleState, CaptureError> {
        match self.state {
            ToggleState::Idle => {
                let session = self.session.take().expect("session present in Idle");
                let (ready_tx, ready_rx) = oneshot::channel();
                tokio::spawn(async move {
                    // The receiver is only dropped on teardown.
                    let _ = ready_tx.send(session.begin().await);
                });
                self.pending = Some(ready_rx);
                self.state = ToggleState::Recording;
            }
            ToggleState::Recording => {
                let ready_rx = self.pending.take().expect("pending capture in Recording");
                // end() must not race stream setup: wait until begin() has
                // fully opened the stream before stopping it.
                let capture = ready_rx.await.map_err(|_| {
                    CaptureError::Stream("capture start task dropped before readiness".into())
                })??;
                self.summary = Some(capture.end().await?);
                self.state = ToggleState::Stopped;
            }
            ToggleState::Stopped => {
                debug!("ignoring toggle press after stop");
            }
        }
        Ok(self.state)
    }

    /// The persisted capture, available once `Stopped`.
    pub fn take_summary(&mut self) -> Option<CaptureSummary> {
        self.summary.take()
    }
}
