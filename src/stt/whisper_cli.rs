use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::process::Command;
use tracing::debug;

use super::Segment;

/// Transcriber backed by a whisper.cpp command-line binary.
///
/// Runs `<binary> -m <model> -f <wav>` and parses the timestamped transcript
/// lines the tool prints on stdout.
pub struct WhisperCliTranscriber {
    binary: PathBuf,
    model: PathBuf,
    language: Option<String>,
}

impl WhisperCliTranscriber {
    pub fn new(binary: PathBuf, model: PathBuf, language: Option<String>) -> Self {
        Self {
            binary,
            model,
            language,
        }
    }
}

#[async_trait::async_trait]
impl super::Transcriber for WhisperCliTranscriber {
    async fn transcribe(&self, wav_path: &Path) -> Result<Vec<Segment>> {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("-m").arg(&self.model).arg("-f").arg(wav_path);
        if let Some(lang) = &self.language {
            cmd.arg("-l").arg(lang);
        }

        let output = cmd
            .output()
            .await
            .with_context(|| format!("failed to run transcriber {}", self.binary.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!(
                "transcriber exited with {}: {}",
                output.status,
                stderr.trim()
            );
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let segments = parse_transcript(&stdout);
        debug!("transcriber produced {} segments", segments.len());
        Ok(segments)
    }

    fn name(&self) -> &str {
        "whisper-cli"
    }
}

/// Parse whisper.cpp stdout into ordered segments.
///
/// Expected shape per line: `[HH:MM:SS.mmm --> HH:MM:SS.mmm]   text`.
/// Lines without the timestamp bracket are kept whole with zeroed timing.
fn parse_transcript(stdout: &str) -> Vec<Segment> {
    stdout
        .lines()
        .filter_map(|line| {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                return None;
            }
            Some(parse_timestamped(trimmed).unwrap_or_else(|| Segment {
                text: trimmed.to_string(),
                start_secs: 0.0,
                end_secs: 0.0,
            }))
        })
        .collect()
}

fn parse_timestamped(line: &str) -> Option<Segment> {
    let rest = line.strip_prefix('[')?;
    let (times, text) = rest.split_once(']')?;
    let (start, end) = times.split_once("-->")?;
    Some(Segment {
        text: text.trim().to_string(),
        start_secs: parse_timestamp(start.trim())?,
        end_secs: parse_timestamp(end.trim())?,
    })
}

/// `HH:MM:SS.mmm` (or `MM:SS.mmm`) → seconds.
fn parse_timestamp(ts: &str) -> Option<f32> {
    let mut secs = 0.0f32;
    for part in ts.split(':') {
        secs = secs * 60.0 + part.trim().parse::<f32>().ok()?;
    }
    Some(secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_timestamped_lines_in_order() {
        let stdout = "\
[00:00:00.000 --> 00:00:02.500]   what is
[00:00:02.500 --> 00:00:04.000]   two plus two
";
        let segments = parse_transcript(stdout);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].text, "what is");
        assert!((segments[0].end_secs - 2.5).abs() < 1e-3);
        assert_eq!(segments[1].text, "two plus two");
        assert!((segments[1].start_secs - 2.5).abs() < 1e-3);
    }

    #[test]
    fn keeps_plain_lines_as_whole_segments() {
        let segments = parse_transcript("hello there\n\n");
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, "hello there");
        assert_eq!(segments[0].start_secs, 0.0);
    }

    #[test]
    fn timestamp_parsing_handles_hours() {
        assert!((parse_timestamp("01:02:03.500").unwrap() - 3723.5).abs() < 1e-3);
        assert!((parse_timestamp("00:05.250").unwrap() - 5.25).abs() < 1e-3);
        assert!(parse_timestamp("not-a-time").is_none());
    }
}
