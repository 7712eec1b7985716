use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;

/// Audio sample data (16-bit PCM, interleaved)
#[derive(Debug, Clone)]
pub struct AudioFrame {
    /// Raw audio samples (i16 PCM, interleaved)
    pub samples: Vec<i16>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels
    pub channels: u16,
    /// Timestamp in milliseconds since capture started
    pub timestamp_ms: u64,
}

/// Configuration for an audio capture backend
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Target sample rate (the backend falls back to the device default if unsupported)
    pub sample_rate: u32,
    /// Target channel count (1 = mono, 2 = stereo)
    pub channels: u16,
    /// Substring match against input device names; empty = default device
    pub device_pattern: String,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000, // 16kHz for speech models
            channels: 1,        // Mono
            device_pattern: String::new(),
        }
    }
}

/// Errors raised by audio capture
#[derive(Debug, Error)]
pub enum CaptureError {
    /// No usable audio input device was found
    #[error("no audio input device available")]
    DeviceUnavailable,

    /// The capture stopped before a single frame was delivered
    #[error("capture produced no audio frames")]
    EmptyCapture,

    /// The OS audio stream failed to build, start, or shut down
    #[error("audio stream error: {0}")]
    Stream(String),

    /// WAV encoding/decoding failure
    #[error("wav error: {0}")]
    Wav(#[from] hound::Error),

    /// Filesystem failure while persisting audio
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Audio capture backend trait
///
/// Implementations own the OS-level input stream and deliver captured frames
/// over the returned channel. The shared `active` flag gates delivery: frames
/// are only forwarded while it is set, so the capture callback never blocks
/// or coordinates beyond a single atomic read.
#[async_trait::async_trait]
pub trait AudioBackend: Send + Sync {
    /// Start capturing audio
    ///
    /// Returns a channel receiver that will receive audio frames. The stream
    /// is fully open and running by the time this returns — completion of
    /// `start()` is the readiness signal callers rely on.
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>, CaptureError>;

    /// Stop capturing audio and release the input stream
    async fn stop(&mut self) -> Result<(), CaptureError>;

    /// The gate read by the capture callback
    fn active_flag(&self) -> Arc<AtomicBool>;

    /// Get backend name for logging
    fn name(&self) -> &str;
}
