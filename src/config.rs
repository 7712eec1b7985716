use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;

/// Top-level configuration; every section has defaults so the config file
/// is optional.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub stt: SttConfig,
    #[serde(default)]
    pub responder: ResponderConfig,
    #[serde(default)]
    pub tts: TtsConfig,
    #[serde(default)]
    pub toggle: ToggleConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AudioConfig {
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    #[serde(default = "default_channels")]
    pub channels: u16,
    /// Substring match against input device names; empty = default device
    #[serde(default)]
    pub device_pattern: String,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            channels: default_channels(),
            device_pattern: String::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PathsConfig {
    /// Where the recorded question is written
    #[serde(default = "default_user_audio")]
    pub user_audio: PathBuf,
    /// Where the synthesized reply is written
    #[serde(default = "default_response_audio")]
    pub response_audio: PathBuf,
    /// Short clip whose voice the synthesizer clones
    #[serde(default = "default_reference_voice")]
    pub reference_voice: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            user_audio: default_user_audio(),
            response_audio: default_response_audio(),
            reference_voice: default_reference_voice(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SttConfig {
    #[serde(default = "default_stt_binary")]
    pub binary: PathBuf,
    #[serde(default = "default_stt_model")]
    pub model: PathBuf,
    /// Forced transcription language; autodetect when unset
    #[serde(default)]
    pub language: Option<String>,
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            binary: default_stt_binary(),
            model: default_stt_model(),
            language: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponderConfig {
    #[serde(default = "default_responder_binary")]
    pub binary: PathBuf,
    #[serde(default = "default_responder_model")]
    pub model: PathBuf,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for ResponderConfig {
    fn default() -> Self {
        Self {
            binary: default_responder_binary(),
            model: default_responder_model(),
            max_tokens: default_max_tokens(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TtsConfig {
    #[serde(default = "default_tts_binary")]
    pub binary: PathBuf,
    #[serde(default = "default_tts_model")]
    pub model: String,
    #[serde(default = "default_tts_language")]
    pub language: String,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            binary: default_tts_binary(),
            model: default_tts_model(),
            language: default_tts_language(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ToggleConfig {
    /// The push-to-talk key: a single character or "space"/"enter"/"tab"
    #[serde(default = "default_toggle_key")]
    pub key: String,
}

impl Default for ToggleConfig {
    fn default() -> Self {
        Self {
            key: default_toggle_key(),
        }
    }
}

fn default_sample_rate() -> u32 {
    16000
}
fn default_channels() -> u16 {
    1
}
fn default_user_audio() -> PathBuf {
    PathBuf::from("user_input.wav")
}
fn default_response_audio() -> PathBuf {
    PathBuf::from("teacher_response.wav")
}
fn default_reference_voice() -> PathBuf {
    PathBuf::from("models/coqui_xtts_v2/reference_teacher.wav")
}
fn default_stt_binary() -> PathBuf {
    PathBuf::from("whisper.cpp/build/bin/whisper-cli")
}
fn default_stt_model() -> PathBuf {
    PathBuf::from("models/faster-whisper-small/ggml-small.bin")
}
fn default_responder_binary() -> PathBuf {
    PathBuf::from("llama.cpp/build/bin/llama-simple")
}
fn default_responder_model() -> PathBuf {
    PathBuf::from("models/gemma-3n-E2B-it-Q4_0.gguf")
}
fn default_max_tokens() -> u32 {
    200
}
fn default_tts_binary() -> PathBuf {
    PathBuf::from("tts")
}
fn default_tts_model() -> String {
    "tts_models/multilingual/multi-dataset/xtts_v2".to_string()
}
fn default_tts_language() -> String {
    "en".to_string()
}
fn default_toggle_key() -> String {
    "space".to_string()
}

impl Config {
    /// Load configuration from a TOML file (extension optional); all values
    /// fall back to defaults when the file or a key is missing.
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
