// Microphone capture backend built on cpal.
//
// The cpal stream is !Send, so it lives on a dedicated capture thread for its
// whole lifetime. `start()` returns once the stream is playing; `stop()`
// signals the thread and joins it, which drops the stream and closes the
// frame channel.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleFormat, SampleRate, StreamConfig};
use tokio::sync::{mpsc, oneshot};
use tracing::{info, warn};

use super::backend::{AudioBackend, AudioFrame, CaptureConfig, CaptureError};

/// How many frames may sit in the channel before the capture callback
/// starts dropping; ~100ms blocks at 16kHz make this minutes of headroom.
const FRAME_CHANNEL_CAPACITY: usize = 512;

pub struct CpalBackend {
    config: CaptureConfig,
    active: Arc<AtomicBool>,
    worker: Option<StreamWorker>,
}

struct StreamWorker {
    stop_tx: mpsc::Sender<()>,
    handle: JoinHandle<()>,
}

impl CpalBackend {
    pub fn new(config: CaptureConfig, active: Arc<AtomicBool>) -> Self {
        Self {
            config,
            active,
            worker: None,
        }
    }
}

#[async_trait::async_trait]
impl AudioBackend for CpalBackend {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>, CaptureError> {
        if self.worker.is_some() {
            return Err(CaptureError::Stream("capture already started".into()));
        }

        let (frame_tx, frame_rx) = mpsc::channel(FRAME_CHANNEL_CAPACITY);
        let (ready_tx, ready_rx) = oneshot::channel();
        let (stop_tx, mut stop_rx) = mpsc::channel::<()>(1);

        let config = self.config.clone();
        let active = Arc::clone(&self.active);

        let handle = std::thread::Builder::new()
            .name("audio-capture".into())
            .spawn(move || {
                let stream = match build_capture_stream(&config, active, frame_tx) {
                    Ok(stream) => {
                        let _ = ready_tx.send(Ok(()));
                        stream
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                // Park until stop; dropping the stream tears down the OS
                // callback and with it the frame sender.
                let _ = stop_rx.blocking_recv();
                drop(stream);
            })?;

        ready_rx
            .await
            .map_err(|_| CaptureError::Stream("capture thread exited during startup".into()))??;

        self.worker = Some(StreamWorker { stop_tx, handle });
        Ok(frame_rx)
    }

    async fn stop(&mut self) -> Result<(), CaptureError> {
        if let Some(worker) = self.worker.take() {
            let _ = worker.stop_tx.send(()).await;
            let handle = worker.handle;
            tokio::task::spawn_blocking(move || handle.join())
                .await
                .map_err(|e| CaptureError::Stream(format!("stop task failed: {e}")))?
                .map_err(|_| CaptureError::Stream("audio capture thread panicked".into()))?;
        }
        Ok(())
    }

    fn active_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.active)
    }

    fn name(&self) -> &str {
        "cpal microphone"
    }
}

/// Find an input device matching `pattern` (falling back to the default
/// device) and a f32 stream config at the requested sample rate (falling back
/// to the device default when the exact rate isn't supported).
fn resolve_input_device(config: &CaptureConfig) -> Result<(Device, StreamConfig), CaptureError> {
    let host = cpal::default_host();
    let pattern = config.device_pattern.to_lowercase();

    let device = if pattern.is_empty() {
        host.default_input_device()
    } else {
        host.input_devices()
            .map_err(|_| CaptureError::DeviceUnavailable)?
            .find(|d| {
                d.name()
                    .map(|n| n.to_lowercase().contains(&pattern))
                    .unwrap_or(false)
            })
            .or_else(|| host.default_input_device())
    }
    .ok_or(CaptureError::DeviceUnavailable)?;

    let desired_rate = SampleRate(config.sample_rate);
    let stream_config: StreamConfig = match device
        .supported_input_configs()
        .map_err(|e| CaptureError::Stream(format!("cannot query device input configs: {e}")))?
        .find(|c| {
            c.sample_format() == SampleFormat::F32
                && c.channels() >= 1
                && c.min_sample_rate() <= desired_rate
                && desired_rate <= c.max_sample_rate()
        }) {
        Some(range) => {
            let mut sc: StreamConfig = range.with_sample_rate(desired_rate).into();
            sc.channels = sc.channels.min(config.channels.max(1));
            sc
        }
        None => {
            let default = device
                .default_input_config()
                .map_err(|e| CaptureError::Stream(format!("no default input config: {e}")))?;
            if default.sample_format() != SampleFormat::F32 {
                return Err(CaptureError::Stream(format!(
                    "unsupported input sample format: {:?}",
                    default.sample_format()
                )));
            }
            let device_name = device.name().unwrap_or_else(|_| "<unknown>".into());
            warn!(
                "{}Hz not supported by '{}'; falling back to {}Hz, {}ch",
                config.sample_rate,
                device_name,
                default.sample_rate().0,
                default.channels(),
            );
            default.into()
        }
    };

    Ok((device, stream_config))
}

/// Downmix interleaved multi-channel audio to mono by averaging channels per frame.
fn downmix_to_mono(data: &[f32], channels: u16) -> Vec<f32> {
    if channels <= 1 {
        return data.to_vec();
    }
    let ch = channels as usize;
    data.chunks_exact(ch)
        .map(|frame| frame.iter().sum::<f32>() / ch as f32)
        .collect()
}

fn build_capture_stream(
    config: &CaptureConfig,
    active: Arc<AtomicBool>,
    frame_tx: mpsc::Sender<AudioFrame>,
) -> Result<cpal::Stream, CaptureError> {
    let (device, stream_config) = resolve_input_device(config)?;

    let device_name = device.name().unwrap_or_else(|_| "<unknown>".into());
    let actual_rate = stream_config.sample_rate.0;
    let channels = stream_config.channels;
    info!(
        "audio device: {} ({}Hz, {}ch{})",
        device_name,
        actual_rate,
        channels,
        if channels > 1 { ", downmixing to mono" } else { "" },
    );

    let mut samples_sent: u64 = 0;
    let stream = device
        .build_input_stream(
            &stream_config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                if !active.load(Ordering::SeqCst) {
                    return;
                }
                let mono = downmix_to_mono(data, channels);
                let samples: Vec<i16> = mono
                    .iter()
                    .map(|&s| (s.clamp(-1.0, 1.0) * 32767.0) as i16)
                    .collect();
                let timestamp_ms = samples_sent * 1000 / u64::from(actual_rate);
                samples_sent += samples.len() as u64;
                // The audio thread must never block: drop the frame if the
                // channel is full or the receiver is gone.
                let _ = frame_tx.try_send(AudioFrame {
                    samples,
                    sample_rate: actual_rate,
                    channels: 1,
                    timestamp_ms,
                });
            },
            |err| warn!("audio capture error: {err}"),
            None,
        )
        .map_err(|e| CaptureError::Stream(format!("failed to build input stream: {e}")))?;

    stream
        .play()
        .map_err(|e| CaptureError::Stream(format!("failed to start input stream: {e}")))?;

    Ok(stream)
}
