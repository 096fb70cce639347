//! `SpeechOutput` implementations used in speak mode.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::info;

use taskpilot_config::SpeechConfig;
use taskpilot_core::SpeechOutput;

use crate::engine::{
    AudioFormat, ELEVENLABS_DEFAULT_VOICES, OPENAI_DEFAULT_VOICES, TtsProvider, TtsProviderKind,
    TtsRequest, create_tts,
};

const DEFAULT_OUTPUT_DIR: &str = "taskpilot_speech";

/// Emits spoken lines to the log instead of producing audio.
#[derive(Debug, Default)]
pub struct LogSpeech;

#[async_trait]
impl SpeechOutput for LogSpeech {
    async fn say(&self, text: &str, voice: usize) -> Result<()> {
        info!(target: "speech", voice, "{text}");
        Ok(())
    }
}

/// Synthesizes speech and writes each utterance to a numbered audio file.
pub struct AudioFileSpeech {
    provider: Box<dyn TtsProvider>,
    voices: Vec<String>,
    output_dir: PathBuf,
    counter: AtomicU64,
}

impl AudioFileSpeech {
    pub fn new(provider: Box<dyn TtsProvider>, voices: Vec<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            provider,
            voices,
            output_dir: output_dir.into(),
            counter: AtomicU64::new(0),
        }
    }

    /// Voice id for a handler voice index; out-of-range indices use the provider default.
    fn voice_id(&self, voice: usize) -> Option<String> {
        self.voices.get(voice).cloned()
    }
}

#[async_trait]
impl SpeechOutput for AudioFileSpeech {
    async fn say(&self, text: &str, voice: usize) -> Result<()> {
        let format = AudioFormat::Mp3;
        let audio = self
            .provider
            .synthesize(TtsRequest {
                text: text.to_string(),
                voice: self.voice_id(voice),
                format,
            })
            .await?;

        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .with_context(|| format!("Failed to create {}", self.output_dir.display()))?;
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        let path = self
            .output_dir
            .join(format!("speech-{n:04}.{}", format.extension()));
        tokio::fs::write(&path, &audio).await?;
        info!(target: "speech", provider = self.provider.name(), path = %path.display(), "{text}");
        Ok(())
    }
}

fn provider_kind(config: &SpeechConfig) -> Option<(TtsProviderKind, [&'static str; 2])> {
    let api_key = config.api_key.clone().filter(|k| !k.trim().is_empty())?;
    match config.provider.as_deref() {
        Some("openai") => Some((TtsProviderKind::OpenAi { api_key }, OPENAI_DEFAULT_VOICES)),
        Some("elevenlabs") => Some((TtsProviderKind::ElevenLabs { api_key }, ELEVENLABS_DEFAULT_VOICES)),
        _ => None,
    }
}

/// Build the speech output selected by the `speech` config section.
///
/// Falls back to the log voice when no provider key is configured.
pub fn speech_from_config(config: Option<&SpeechConfig>) -> Arc<dyn SpeechOutput> {
    let Some(config) = config else {
        return Arc::new(LogSpeech);
    };
    let Some((kind, defaults)) = provider_kind(config) else {
        return Arc::new(LogSpeech);
    };
    let voices = if config.voices.is_empty() {
        defaults.iter().map(|v| v.to_string()).collect()
    } else {
        config.voices.clone()
    };
    let output_dir = config.output_dir.as_deref().unwrap_or(DEFAULT_OUTPUT_DIR);
    Arc::new(AudioFileSpeech::new(create_tts(kind), voices, output_dir))
}
