//! Pipeline — wires together capture output → STT → Responder → TTS.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;
use tracing::{info, warn};

use crate::audio::wav;
use crate::config::Config;
use crate::responder::{extract_reply, LlamaResponder, Responder};
use crate::stt::{join_segments, Transcriber, WhisperCliTranscriber};
use crate::tts::{Synthesizer, XttsCliSynthesizer};

pub struct Pipeline {
    pub stt: Box<dyn Transcriber>,
    pub responder: Box<dyn Responder>,
    pub tts: Box<dyn Synthesizer>,
}

/// What one pipeline run produced.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    /// The transcribed question
    pub transcript: String,
    /// The extracted reply; may be empty
    pub reply: String,
    /// Where the synthesized reply was written; `None` when synthesis was
    /// skipped because the reply was empty
    pub response_audio: Option<PathBuf>,
}

impl Pipeline {
    /// Build a pipeline from config, creating all collaborator backends.
    pub fn from_config(cfg: &Config) -> Self {
        let stt = WhisperCliTranscriber::new(
            cfg.stt.binary.clone(),
            cfg.stt.model.clone(),
            cfg.stt.language.clone(),
        );
        let responder = LlamaResponder::new(
            cfg.responder.binary.clone(),
            cfg.responder.model.clone(),
            cfg.responder.max_tokens,
        );
        let tts = XttsCliSynthesizer::new(cfg.tts.binary.clone(), cfg.tts.model.clone());

        let pipeline = Self {
            stt: Box::new(stt),
            responder: Box::new(responder),
            tts: Box::new(tts),
        };
        info!(
            "pipeline: stt={}, responder={}, tts={}",
            pipeline.stt.name(),
            pipeline.responder.name(),
            pipeline.tts.name(),
        );
        pipeline
    }

    /// Run the full flow once: transcribe → generate → extract → synthesize.
    ///
    /// An empty extracted reply is not an error: synthesis is skipped and
    /// `response_audio` stays `None`.
    pub async fn run(
        &self,
        recorded_wav: &Path,
        reference_voice: &Path,
        language: &str,
        out_path: &Path,
    ) -> Result<PipelineOutcome> {
        let start = Instant::now();

        info!("transcribing...");
        let segments = self.stt.transcribe(recorded_wav).await?;
        let transcript = join_segments(&segments);
        info!(
            "transcript ({:.1}s): {}",
            start.elapsed().as_secs_f64(),
            transcript
        );

        info!("thinking...");
        let raw = self.responder.respond(&transcript).await?;
        let reply = extract_reply(&raw).to_string();

        if reply.trim().is_empty() {
            warn!("responder produced no usable reply, skipping synthesis");
            return Ok(PipelineOutcome {
                transcript,
                reply,
                response_audio: None,
            });
        }
        info!("reply: {}", reply);

        info!("generating voice...");
        let audio = self
            .tts
            .synthesize(&reply, reference_voice, language)
            .await?;
        wav::write_f32_wav(out_path, &audio.samples, audio.sample_rate, 1)?;
        info!(
            "response audio saved to {} ({:.1}s)",
            out_path.display(),
            audio.duration_secs()
        );

        Ok(PipelineOutcome {
            transcript,
            reply,
            response_audio: Some(out_path.to_path_buf()),
        })
    }
}
