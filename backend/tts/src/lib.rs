//! Speech output for speak mode: a log-only voice and audio synthesis
//! through OpenAI or ElevenLabs written to files.

pub mod engine;
pub mod speech;

pub use engine::{create_tts, AudioFormat, ElevenLabsTts, OpenAiTts, TtsProvider, TtsProviderKind, TtsRequest};
pub use speech::{speech_from_config, AudioFileSpeech, LogSpeech};
