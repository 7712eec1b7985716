// List audio input devices and optionally probe the capture stream.
//
// Usage: cargo run --bin mic_check -- --duration 3

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use cpal::traits::{DeviceTrait, HostTrait};
use tracing::{info, warn, Level};

use talkback::{AudioBackend, CaptureConfig, CpalBackend};

#[derive(Parser)]
#[command(name = "mic_check")]
#[command(about = "List input devices and probe the capture stream")]
struct Args {
    /// Record a probe of this many seconds (0 = list devices only)
    #[arg(short, long, default_value = "0")]
    duration: u64,

    /// Substring match against input device names
    #[arg(long, default_value = "")]
    device: String,

    /// Sample rate to request
    #[arg(long, default_value = "16000")]
    sample_rate: u32,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let args = Args::parse();

    let host = cpal::default_host();
    match host.input_devices() {
        Ok(devices) => {
            info!("input devices:");
            for device in devices {
                let name = device.name().unwrap_or_else(|_| "<unknown>".into());
                info!("  - {name}");
            }
        }
        Err(e) => warn!("failed to enumerate input devices: {e}"),
    }

    if args.duration == 0 {
        return Ok(());
    }

    // Flag starts raised: the probe captures from the first callback.
    let active = Arc::new(AtomicBool::new(true));
    let config = CaptureConfig {
        sample_rate: args.sample_rate,
        channels: 1,
        device_pattern: args.device,
    };
    let mut backend = CpalBackend::new(config, active);

    info!("probing capture for {}s...", args.duration);
    let mut frame_rx = backend.start().await?;

    let counter = tokio::spawn(async move {
        let mut frames = 0usize;
        let mut samples = 0usize;
        while let Some(frame) = frame_rx.recv().await {
            frames += 1;
            samples += frame.samples.len();
        }
        (frames, samples)
    });

    tokio::time::sleep(Duration::from_secs(args.duration)).await;
    backend.stop().await?;

    let (frames, samples) = counter.await?;
    info!(
        "captured {frames} frames / {samples} samples in {}s",
        args.duration
    );
    if frames == 0 {
        warn!("no frames captured — check the input device");
    }

    Ok(())
}
