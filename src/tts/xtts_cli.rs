use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::process::Command;
use tracing::debug;

use crate::audio::wav;

use super::SynthAudio;

/// Synthesizer backed by an XTTS-style `tts` command-line tool.
///
/// The tool writes a WAV to a scratch path, which is read back and returned
/// as float samples at the synthesizer's native rate.
pub struct XttsCliSynthesizer {
    binary: PathBuf,
    model: String,
}

impl XttsCliSynthesizer {
    pub fn new(binary: PathBuf, model: String) -> Self {
        Self { binary, model }
    }
}

#[async_trait::async_trait]
impl super::Synthesizer for XttsCliSynthesizer {
    async fn synthesize(
        &self,
        text: &str,
        speaker_wav: &Path,
        language: &str,
    ) -> Result<SynthAudio> {
        let scratch = tempfile::Builder::new()
            .prefix("talkback-tts-")
            .suffix(".wav")
            .tempfile()
            .context("failed to create scratch file for synthesis")?;

        let output = Command::new(&self.binary)
            .arg("--model_name")
            .arg(&self.model)
            .arg("--text")
            .arg(text)
            .arg("--speaker_wav")
            .arg(speaker_wav)
            .arg("--language_idx")
            .arg(language)
            .arg("--out_path")
            .arg(scratch.path())
            .output()
            .await
            .with_context(|| format!("failed to run synthesizer {}", self.binary.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!(
                "synthesizer exited with {}: {}",
                output.status,
                stderr.trim()
            );
        }

        let (samples, sample_rate, _channels) =
            wav::read_f32_wav(scratch.path()).context("failed to read synthesized audio")?;
        debug!(
            "synthesizer produced {} samples at {}Hz",
            samples.len(),
            sample_rate
        );

        Ok(SynthAudio {
            samples,
            sample_rate,
        })
    }

    fn name(&self) -> &str {
        "xtts-cli"
    }
}
