//! Config defaults: applies sensible default values to parsed config.

use crate::schema::{
    BrowseConfig, LlmConfig, LoggingConfig, SearchConfig, SpeechConfig, TaskPilotConfig,
    WorkspaceConfig,
};

pub const DEFAULT_FAST_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_SMART_MODEL: &str = "gpt-4";
pub const DEFAULT_LLM_BASE_URL: &str = "https://api.openai.com/v1";

/// Results requested from either search provider.
pub const DEFAULT_SEARCH_RESULTS: usize = 8;

/// Characters per chunk handed to the summarizer.
pub const DEFAULT_CHUNK_SIZE: usize = 8192;

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/112.0 Safari/537.36";

pub const DEFAULT_WORKSPACE_DIR: &str = "taskpilot_workspace";
pub const DEFAULT_PYTHON: &str = "python3";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: TaskPilotConfig) -> TaskPilotConfig {
    let config = apply_llm_defaults(config);
    let config = apply_search_defaults(config);
    let config = apply_browse_defaults(config);
    let config = apply_workspace_defaults(config);
    let config = apply_speech_defaults(config);
    apply_logging_defaults(config)
}

fn apply_llm_defaults(mut config: TaskPilotConfig) -> TaskPilotConfig {
    let llm = config.llm.get_or_insert_with(LlmConfig::default);
    llm.base_url.get_or_insert_with(|| DEFAULT_LLM_BASE_URL.to_string());
    llm.fast_model.get_or_insert_with(|| DEFAULT_FAST_MODEL.to_string());
    llm.smart_model.get_or_insert_with(|| DEFAULT_SMART_MODEL.to_string());
    config
}

fn apply_search_defaults(mut config: TaskPilotConfig) -> TaskPilotConfig {
    let search = config.search.get_or_insert_with(SearchConfig::default);
    if search.num_results.is_none() {
        search.num_results = Some(DEFAULT_SEARCH_RESULTS);
    }
    config
}

fn apply_browse_defaults(mut config: TaskPilotConfig) -> TaskPilotConfig {
    let browse = config.browse.get_or_insert_with(BrowseConfig::default);
    browse.user_agent.get_or_insert_with(|| DEFAULT_USER_AGENT.to_string());
    if browse.chunk_size.is_none() {
        browse.chunk_size = Some(DEFAULT_CHUNK_SIZE);
    }
    config
}

fn apply_workspace_defaults(mut config: TaskPilotConfig) -> TaskPilotConfig {
    let workspace = config.workspace.get_or_insert_with(WorkspaceConfig::default);
    workspace.dir.get_or_insert_with(|| DEFAULT_WORKSPACE_DIR.to_string());
    workspace.python.get_or_insert_with(|| DEFAULT_PYTHON.to_string());
    config
}

/// Speak mode off, log-only voice unless a provider is named.
fn apply_speech_defaults(mut config: TaskPilotConfig) -> TaskPilotConfig {
    let speech = config.speech.get_or_insert_with(SpeechConfig::default);
    if speech.enabled.is_none() {
        speech.enabled = Some(false);
    }
    speech.provider.get_or_insert_with(|| "log".to_string());
    config
}

fn apply_logging_defaults(mut config: TaskPilotConfig) -> TaskPilotConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    logging.level.get_or_insert_with(|| DEFAULT_LOG_LEVEL.to_string());
    if logging.json.is_none() {
        logging.json = Some(false);
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_models_and_results() {
        let cfg = apply_all_defaults(TaskPilotConfig::default());
        let llm = cfg.llm.as_ref().unwrap();
        assert_eq!(llm.fast_model.as_deref(), Some(DEFAULT_FAST_MODEL));
        assert_eq!(llm.base_url.as_deref(), Some(DEFAULT_LLM_BASE_URL));
        assert_eq!(cfg.search.as_ref().unwrap().num_results, Some(DEFAULT_SEARCH_RESULTS));
        assert_eq!(cfg.browse.as_ref().unwrap().chunk_size, Some(DEFAULT_CHUNK_SIZE));
        assert_eq!(cfg.workspace_dir(), DEFAULT_WORKSPACE_DIR);
        assert!(!cfg.speak_mode());
    }

    #[test]
    fn does_not_override_user_values() {
        let mut cfg = TaskPilotConfig::default();
        cfg.search = Some(SearchConfig {
            num_results: Some(3),
            ..Default::default()
        });
        cfg.speech = Some(SpeechConfig {
            enabled: Some(true),
            provider: Some("openai".into()),
            ..Default::default()
        });
        let cfg = apply_all_defaults(cfg);
        assert_eq!(cfg.search_results(), 3);
        assert!(cfg.speak_mode());
        assert_eq!(cfg.speech.unwrap().provider.as_deref(), Some("openai"));
    }
}
