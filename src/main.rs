use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use talkback::listener::{self, ListenerEvent};
use talkback::{
    CaptureConfig, CaptureSession, Config, CpalBackend, Pipeline, RecordingToggle, ToggleState,
};

#[derive(Parser)]
#[command(name = "talkback")]
#[command(about = "Push-to-talk voice assistant: record a question, speak the answer")]
struct Args {
    /// Config file (TOML, extension optional)
    #[arg(short, long, default_value = "config/talkback")]
    config: String,

    /// Override the responder's max token count
    #[arg(long)]
    max_tokens: Option<u32>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let mut cfg = Config::load(&args.config)?;
    if let Some(n) = args.max_tokens {
        cfg.responder.max_tokens = n;
    }

    let toggle_key = listener::parse_toggle_key(&cfg.toggle.key)?;

    let capture_config = CaptureConfig {
        sample_rate: cfg.audio.sample_rate,
        channels: cfg.audio.channels,
        device_pattern: cfg.audio.device_pattern.clone(),
    };
    let active = Arc::new(AtomicBool::new(false));
    let backend = CpalBackend::new(capture_config, active);
    let session = CaptureSession::new(Box::new(backend), cfg.paths.user_audio.clone());
    let mut toggle = RecordingToggle::new(session);

    info!(
        "press {} to start recording, press it again to stop (q or Esc aborts)",
        cfg.toggle.key
    );
    let (mut events, key_listener) = listener::spawn(toggle_key)?;

    while toggle.state() != ToggleState::Stopped {
        match events.recv().await {
            Some(ListenerEvent::Toggle) => {
                toggle.press().await?;
            }
            Some(ListenerEvent::Quit) => {
                anyhow::bail!("aborted before recording finished");
            }
            None => {
                anyhow::bail!("key listener stopped unexpectedly");
            }
        }
    }
    key_listener.shutdown();

    let Some(summary) = toggle.take_summary() else {
        anyhow::bail!("recording stopped without a captured session");
    };

    let pipeline = Pipeline::from_config(&cfg);
    pipeline
        .run(
            &summary.path,
            &cfg.paths.reference_voice,
            &cfg.tts.language,
            &cfg.paths.response_audio,
        )
        .await?;

    Ok(())
}
