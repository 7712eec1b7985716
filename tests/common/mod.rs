// Shared test doubles for the capture and toggle tests.

#![allow(dead_code)]

use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;

use talkback::{AudioBackend, AudioFrame, CaptureError};

/// Backend that replays canned frames instead of opening a device.
///
/// `start()` optionally sleeps before reporting readiness so tests can race
/// the stop transition against stream setup. Every lifecycle call is
/// appended to `log`.
pub struct StubBackend {
    frames: Vec<AudioFrame>,
    active: Arc<AtomicBool>,
    start_delay: Duration,
    log: Arc<Mutex<Vec<&'static str>>>,
    tx: Option<mpsc::Sender<AudioFrame>>,
}

impl StubBackend {
    pub fn new(frames: Vec<AudioFrame>) -> Self {
        Self {
            frames,
            active: Arc::new(AtomicBool::new(false)),
            start_delay: Duration::ZERO,
            log: Arc::new(Mutex::new(Vec::new())),
            tx: None,
        }
    }

    pub fn with_start_delay(mut self, delay: Duration) -> Self {
        self.start_delay = delay;
        self
    }

    pub fn log(&self) -> Arc<Mutex<Vec<&'static str>>> {
        Arc::clone(&self.log)
    }
}

#[async_trait::async_trait]
impl AudioBackend for StubBackend {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>, CaptureError> {
        self.log.lock().unwrap().push("start:called");
        if !self.start_delay.is_zero() {
            tokio::time::sleep(self.start_delay).await;
        }

        let (tx, rx) = mpsc::channel(self.frames.len() + 1);
        for frame in self.frames.drain(..) {
            tx.send(frame).await.expect("stub channel has capacity");
        }
        // Keep the sender until stop() so the drain keeps waiting, like a
        // live stream would.
        self.tx = Some(tx);

        self.log.lock().unwrap().push("start:ready");
        Ok(rx)
    }

    async fn stop(&mut self) -> Result<(), CaptureError> {
        self.log.lock().unwrap().push("stop:called");
        self.tx.take();
        Ok(())
    }

    fn active_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.active)
    }

    fn name(&self) -> &str {
        "stub"
    }
}

/// Backend whose device is never available.
pub struct UnavailableBackend;

#[async_trait::async_trait]
impl AudioBackend for UnavailableBackend {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>, CaptureError> {
        Err(CaptureError::DeviceUnavailable)
    }

    async fn stop(&mut self) -> Result<(), CaptureError> {
        Ok(())
    }

    fn active_flag(&self) -> Arc<AtomicBool> {
        Arc::new(AtomicBool::new(false))
    }

    fn name(&self) -> &str {
        "unavailable"
    }
}

/// One mono 16kHz frame with the given samples.
pub fn frame(samples: Vec<i16>, timestamp_ms: u64) -> AudioFrame {
    AudioFrame {
        samples,
        sample_rate: 16000,
        channels: 1,
        timestamp_ms,
    }
}
