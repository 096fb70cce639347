/// Speech synthesis backends (OpenAI TTS and ElevenLabs) behind one trait.
use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use serde::Serialize;
use tracing::info;

const OPENAI_TTS_URL: &str = "https://api.openai.com/v1/audio/speech";
const ELEVENLABS_URL: &str = "https://api.elevenlabs.io/v1/text-to-speech";

/// Voices used when the config lists none.
pub const OPENAI_DEFAULT_VOICES: [&str; 2] = ["onyx", "nova"];
pub const ELEVENLABS_DEFAULT_VOICES: [&str; 2] = ["ErXwobaYiN019PkySvjV", "EXAVITQu4vr4xnSDxMaL"];

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AudioFormat {
    #[default]
    Mp3,
    Opus,
    Flac,
}

impl AudioFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Opus => "opus",
            Self::Flac => "flac",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TtsRequest {
    pub text: String,
    /// Provider voice id; `None` uses the provider default.
    pub voice: Option<String>,
    pub format: AudioFormat,
}

/// Returns raw audio bytes.
#[async_trait]
pub trait TtsProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn synthesize(&self, req: TtsRequest) -> Result<Bytes>;
}

// ---------------------------------------------------------------------------
// OpenAI TTS
// ---------------------------------------------------------------------------

pub struct OpenAiTts {
    api_key: String,
    model: String,
    url: String,
    client: Client,
}

impl OpenAiTts {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: "tts-1".to_string(),
            url: OPENAI_TTS_URL.to_string(),
            client: Client::new(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

#[derive(Serialize)]
struct OpenAiTtsBody<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    response_format: &'a str,
}

#[async_trait]
impl TtsProvider for OpenAiTts {
    fn name(&self) -> &str {
        "openai"
    }

    async fn synthesize(&self, req: TtsRequest) -> Result<Bytes> {
        let voice = req.voice.as_deref().unwrap_or(OPENAI_DEFAULT_VOICES[0]);
        let body = OpenAiTtsBody {
            model: &self.model,
            input: &req.text,
            voice,
            response_format: req.format.extension(),
        };
        info!(model = %self.model, voice, "Synthesizing speech with OpenAI");
        let bytes = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("OpenAI TTS request failed")?
            .error_for_status()?
            .bytes()
            .await?;
        Ok(bytes)
    }
}

// ---------------------------------------------------------------------------
// ElevenLabs TTS
// ---------------------------------------------------------------------------

pub struct ElevenLabsTts {
    api_key: String,
    base_url: String,
    client: Client,
}

impl ElevenLabsTts {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: ELEVENLABS_URL.to_string(),
            client: Client::new(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self, voice_id: &str) -> String {
        format!("{}/{}", self.base_url, voice_id)
    }
}

#[derive(Serialize)]
struct ElevenLabsBody<'a> {
    text: &'a str,
}

#[async_trait]
impl TtsProvider for ElevenLabsTts {
    fn name(&self) -> &str {
        "elevenlabs"
    }

    async fn synthesize(&self, req: TtsRequest) -> Result<Bytes> {
        let voice_id = req.voice.as_deref().unwrap_or(ELEVENLABS_DEFAULT_VOICES[0]);
        info!(voice_id, "Synthesizing speech with ElevenLabs");
        let bytes = self
            .client
            .post(self.endpoint(voice_id))
            .header("xi-api-key", &self.api_key)
            .json(&ElevenLabsBody { text: &req.text })
            .send()
            .await
            .context("ElevenLabs TTS request failed")?
            .error_for_status()?
            .bytes()
            .await?;
        Ok(bytes)
    }
}

// ---------------------------------------------------------------------------
// Factory
// ---------------------------------------------------------------------------

pub enum TtsProviderKind {
    OpenAi { api_key: String },
    ElevenLabs { api_key: String },
}

pub fn create_tts(kind: TtsProviderKind) -> Box<dyn TtsProvider> {
    match kind {
        TtsProviderKind::OpenAi { api_key } => Box::new(OpenAiTts::new(api_key)),
        TtsProviderKind::ElevenLabs { api_key } => Box::new(ElevenLabsTts::new(api_key)),
    }
}
