//! Responder — local language-model subprocess and reply extraction.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio::process::Command;
use tracing::debug;

/// Trait for text-generation backends.
#[async_trait::async_trait]
pub trait Responder: Send + Sync {
    /// Generate a raw response for `prompt`; the returned string is the
    /// collaborator's unfiltered stdout.
    async fn respond(&self, prompt: &str) -> Result<String>;

    /// Human-readable name for logs.
    fn name(&self) -> &str;
}

/// Responder backed by a llama.cpp-style binary:
/// `<binary> -m <model> -p <prompt> -n <max_tokens>`.
pub struct LlamaResponder {
    binary: PathBuf,
    model: PathBuf,
    max_tokens: u32,
}

impl LlamaResponder {
    pub fn new(binary: PathBuf, model: PathBuf, max_tokens: u32) -> Self {
        Self {
            binary,
            model,
            max_tokens,
        }
    }
}

#[async_trait::async_trait]
impl Responder for LlamaResponder {
    async fn respond(&self, prompt: &str) -> Result<String> {
        let output = Command::new(&self.binary)
            .arg("-m")
            .arg(&self.model)
            .arg("-p")
            .arg(prompt)
            .arg("-n")
            .arg(self.max_tokens.to_string())
            .output()
            .await
            .with_context(|| format!("failed to run responder {}", self.binary.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("responder exited with {}: {}", output.status, stderr.trim());
        }

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!("responder produced {} bytes of output", stdout.len());
        Ok(stdout)
    }

    fn name(&self) -> &str {
        "llama-cli"
    }
}

/// Pick the usable reply out of the model's raw stdout: the first line that
/// is non-blank and is not a diagnostic (`<`-tagged or `main:`-prefixed).
/// Returns the empty string when no line qualifies — a valid, if useless,
/// reply the caller must handle.
pub fn extract_reply(raw: &str) -> &str {
    raw.lines()
        .find(|line| {
            !line.trim().is_empty() && !line.starts_with('<') && !line.starts_with("main:")
        })
        .unwrap_or("")
}
