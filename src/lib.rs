pub mod audio;
pub mod config;
pub mod listener;
pub mod pipeline;
pub mod recorder;
pub mod responder;
pub mod stt;
pub mod tts;

pub use audio::{AudioBackend, AudioFrame, CaptureConfig, CaptureError, CpalBackend};
pub use config::Config;
pub use listener::{KeyListener, ListenerEvent};
pub use pipeline::{Pipeline, PipelineOutcome};
pub use recorder::{CaptureSession, CaptureSummary, RecordingToggle, ToggleState};
pub use responder::{extract_reply, LlamaResponder, Responder};
pub use stt::{join_segments, Segment, Transcriber, WhisperCliTranscriber};
pub use tts::{SynthAudio, Synthesizer, XttsCliSynthesizer};
