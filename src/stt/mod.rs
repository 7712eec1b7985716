//! Speech-to-text — pluggable trait over external transcription collaborators.

mod whisper_cli;

use std::path::Path;

use anyhow::Result;

pub use whisper_cli::WhisperCliTranscriber;

/// A time-bounded span of transcribed text.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// Transcribed text
    pub text: String,
    /// Segment start, seconds from the beginning of the audio
    pub start_secs: f32,
    /// Segment end, seconds from the beginning of the audio
    pub end_secs: f32,
}

/// Trait for speech-to-text backends.
#[async_trait::async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe audio from a WAV file path into ordered segments.
    async fn transcribe(&self, wav_path: &Path) -> Result<Vec<Segment>>;

    /// Human-readable name for logs.
    fn name(&self) -> &str;
}

/// Join segment texts, in order, into the prompt passed to the responder.
pub fn join_segments(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|s| s.text.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
