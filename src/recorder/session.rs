use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tracing::info;

use crate::audio::{wav, AudioBackend, AudioFrame, CaptureError};

/// A single push-to-talk capture: created once per run, started on the first
/// toggle press, persisted on the second.
///
/// Lifecycle is strictly `begin` → capture → `end`, enforced by ownership:
/// `begin()` consumes the session and returns an [`ActiveCapture`], and
/// `end()` consumes that. There is no restart.
pub struct CaptureSession {
    session_id: String,
    backend: Box<dyn AudioBackend>,
    active: Arc<AtomicBool>,
    out_path: PathBuf,
}

/// A capture whose input stream is open and delivering frames.
pub struct ActiveCapture {
    session_id: String,
    backend: Box<dyn AudioBackend>,
    active: Arc<AtomicBool>,
    out_path: PathBuf,
    drain: JoinHandle<Vec<AudioFrame>>,
    started_at: DateTime<Utc>,
}

impl std::fmt::Debug for ActiveCapture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActiveCapture")
            .field("session_id", &self.session_id)
            .field("active", &self.active)
            .field("out_path", &self.out_path)
            .field("started_at", &self.started_at)
            .finish_non_exhaustive()
    }
}

/// What a finished capture produced.
#[derive(Debug, Clone)]
pub struct CaptureSummary {
    /// Path of the persisted WAV file
    pub path: PathBuf,
    /// Total samples written, summed over all captured frames
    pub sample_count: usize,
    /// Recording duration derived from the sample count
    pub duration_secs: f64,
    /// When the input stream opened
    pub started_at: DateTime<Utc>,
}

impl CaptureSession {
    pub fn new(backend: Box<dyn AudioBackend>, out_path: PathBuf) -> Self {
        let active = backend.active_flag();
        Self {
            session_id: format!("capture-{}", uuid::Uuid::new_v4()),
            backend,
            active,
            out_path,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Open the input stream and start collecting frames.
    ///
    /// The active flag is raised before the stream opens, so the very first
    /// callback already sees it. When this returns the stream is live:
    /// callers may treat completion as the readiness signal.
    pub async fn begin(mut self) -> Result<ActiveCapture, CaptureError> {
        info!("recording started: {}", self.session_id);
        self.active.store(true, Ordering::SeqCst);

        let mut frame_rx = match self.backend.start().await {
            Ok(rx) => rx,
            Err(e) => {
                self.active.store(false, Ordering::SeqCst);
                return Err(e);
            }
        };

        // Sole writer of the frame buffer; ends when the backend drops its
        // sender side.
        let drain = tokio::spawn(async move {
            let mut frames = Vec::new();
            while let Some(frame) = frame_rx.recv().await {
                frames.push(frame);
            }
            frames
        });

        Ok(ActiveCapture {
            session_id: self.session_id,
            backend: self.backend,
            active: self.active,
            out_path: self.out_path,
            drain,
            started_at: Utc::now(),
        })
    }
}

impl ActiveCapture {
    /// Stop the stream, concatenate the captured frames in order, and write
    /// them to the session's WAV path.
    ///
    /// Fails with [`CaptureError::EmptyCapture`] when no frames arrived —
    /// e.g. stop requested before the first callback fired — and in that
    /// case never creates the output file.
    pub async fn end(mut self) -> Result<CaptureSummary, CaptureError> {
        info!("recording stopping: {}", self.session_id);
        self.active.store(false, Ordering::SeqCst);
        self.backend.stop().await?;

        let frames = self
            .drain
            .await
            .map_err(|e| CaptureError::Stream(format!("frame drain task failed: {e}")))?;

        if frames.is_empty() {
            return Err(CaptureError::EmptyCapture);
        }

        let sample_rate = frames[0].sample_rate;
        let channels = frames[0].channels;
        let total: usize = frames.iter().map(|f| f.samples.len()).sum();

        let mut samples = Vec::with_capacity(total);
        for frame in &frames {
            samples.extend_from_slice(&frame.samples);
        }

        wav::write_i16_wav(&self.out_path, &samples, sample_rate, channels)?;

        let duration_secs = samples.len() as f64 / (f64::from(sample_rate) * f64::from(channels));
        info!(
            "saved {} ({:.1}s, {} samples)",
            self.out_path.display(),
            duration_secs,
            samples.len()
        );

        Ok(CaptureSummary {
            path: self.out_path,
            sample_count: samples.len(),
            duration_secs,
            started_at: self.started_at,
        })
    }
}
