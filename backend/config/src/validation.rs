//! Config validation: checks with user-friendly error messages.

use crate::schema::TaskPilotConfig;
use thiserror::Error;

const SPEECH_PROVIDERS: &[&str] = &["log", "openai", "elevenlabs"];

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &TaskPilotConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_llm(config, &mut report);
    validate_search(config, &mut report);
    validate_browse(config, &mut report);
    validate_speech(config, &mut report);
    report
}

fn validate_llm(config: &TaskPilotConfig, report: &mut ValidationReport) {
    let key = config.llm.as_ref().and_then(|l| l.api_key.as_deref());
    if key.map_or(true, |k| k.trim().is_empty()) {
        report.warn(
            "llm.apiKey",
            "No LLM API key configured; summaries, code analysis and sub-agents will fail",
        );
    }
    if config.fast_llm_model().trim().is_empty() {
        report.error("llm.fastModel", "Model name cannot be empty");
    }
    if config.smart_llm_model().trim().is_empty() {
        report.error("llm.smartModel", "Model name cannot be empty");
    }
}

fn validate_search(config: &TaskPilotConfig, report: &mut ValidationReport) {
    if config.google_api_key().is_some()
        && config.custom_search_engine_id().map_or(true, |id| id.trim().is_empty())
    {
        report.warn(
            "search.customSearchEngineId",
            "Google API key is set without a custom search engine id; searches will fail",
        );
    }
    if config.search_results() == 0 {
        report.error("search.numResults", "Must request at least one result");
    }
}

fn validate_browse(config: &TaskPilotConfig, report: &mut ValidationReport) {
    if let Some(size) = config.browse.as_ref().and_then(|b| b.chunk_size) {
        if size < 256 {
            report.error("browse.chunkSize", "Chunk size must be at least 256 characters");
        }
    }
}

fn validate_speech(config: &TaskPilotConfig, report: &mut ValidationReport) {
    let Some(speech) = &config.speech else { return };
    let provider = speech.provider.as_deref().unwrap_or("log");
    if !SPEECH_PROVIDERS.contains(&provider) {
        report.error(
            "speech.provider",
            format!("Unknown provider '{provider}'; expected one of {}", SPEECH_PROVIDERS.join(", ")),
        );
    }
    if config.speak_mode()
        && provider != "log"
        && speech.api_key.as_deref().map_or(true, |k| k.trim().is_empty())
    {
        report.warn("speech.apiKey", "Speak mode is on but the TTS provider has no API key");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::apply_all_defaults;
    use crate::schema::{LlmConfig, SearchConfig, SpeechConfig};

    #[test]
    fn warns_on_missing_llm_key() {
        let report = validate(&apply_all_defaults(TaskPilotConfig::default()));
        assert!(report.is_valid());
        assert!(report.warnings.iter().any(|w| w.path == "llm.apiKey"));
    }

    #[test]
    fn warns_on_google_key_without_engine() {
        let cfg = TaskPilotConfig {
            search: Some(SearchConfig {
                google_api_key: Some("key".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let report = validate(&cfg);
        assert!(report.warnings.iter().any(|w| w.path == "search.customSearchEngineId"));
    }

    #[test]
    fn rejects_unknown_speech_provider() {
        let cfg = TaskPilotConfig {
            llm: Some(LlmConfig {
                api_key: Some("sk".into()),
                ..Default::default()
            }),
            speech: Some(SpeechConfig {
                provider: Some("espeak".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let report = validate(&cfg);
        assert!(!report.is_valid());
        assert_eq!(report.errors[0].path, "speech.provider");
    }
}
