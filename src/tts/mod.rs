//! Text-to-speech — pluggable trait over external synthesis collaborators.

mod xtts_cli;

use std::path::Path;

use anyhow::Result;

pub use xtts_cli::XttsCliSynthesizer;

/// Synthesized waveform at the synthesizer's native rate.
#[derive(Debug, Clone)]
pub struct SynthAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl SynthAudio {
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / f64::from(self.sample_rate)
    }
}

/// Trait for voice-cloning text-to-speech backends.
#[async_trait::async_trait]
pub trait Synthesizer: Send + Sync {
    /// Synthesize `text` in the voice of `speaker_wav`, in `language`.
    async fn synthesize(&self, text: &str, speaker_wav: &Path, language: &str)
        -> Result<SynthAudio>;

    /// Human-readable name for logs.
    fn name(&self) -> &str;
}
