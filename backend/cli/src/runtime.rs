//! Wires config into the collaborators a `CommandContext` needs.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::{info, warn};

use taskpilot_agent::{InMemoryAgentManager, LlmCodeAdvisor};
use taskpilot_commands::{CommandContext, CommandSettings};
use taskpilot_config::defaults::{DEFAULT_CHUNK_SIZE, DEFAULT_PYTHON, DEFAULT_USER_AGENT};
use taskpilot_config::{validate, TaskPilotConfig};
use taskpilot_core::LlmProvider;
use taskpilot_llm::OpenAiCompatibleProvider;
use taskpilot_logging::LogOptions;
use taskpilot_memory::InMemoryStore;
use taskpilot_tools::{
    DuckDuckGoSearch, GoogleCustomSearch, HttpScraper, LlmSummarizer, PythonRunner, Workspace,
};
use taskpilot_tts::speech_from_config;

/// Logger options from config, with the command-line level taking precedence.
pub fn log_options(config: &TaskPilotConfig, level_override: Option<&str>) -> LogOptions {
    let logging = config.logging.as_ref();
    let mut options = LogOptions::default();
    if let Some(level) = level_override.or(logging.and_then(|l| l.level.as_deref())) {
        options.level = level.to_string();
    }
    options.dir = logging.and_then(|l| l.dir.as_ref()).map(PathBuf::from);
    options.json_console = logging.and_then(|l| l.json).unwrap_or(false);
    options
}

/// Re-emit config warnings once the subscriber is installed.
pub fn log_config_warnings(config: &TaskPilotConfig) {
    for warning in validate(config).warnings {
        warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
}

/// Build the handler context for one CLI session.
pub async fn build_context(config: &TaskPilotConfig) -> Result<CommandContext> {
    let llm = config.llm.clone().unwrap_or_default();
    let browse = config.browse.clone().unwrap_or_default();
    let workspace_cfg = config.workspace.clone().unwrap_or_default();

    let client = Client::builder()
        .build()
        .context("Failed to build HTTP client")?;

    let mut provider = OpenAiCompatibleProvider::new(llm.api_key.unwrap_or_default());
    if let Some(base_url) = llm.base_url {
        provider = provider.with_base_url(base_url);
    }
    let provider: Arc<dyn LlmProvider> = Arc::new(provider);

    let workspace = Workspace::new(config.workspace_dir());
    workspace.ensure().await?;

    let user_agent = browse
        .user_agent
        .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());
    let chunk_size = browse.chunk_size.unwrap_or(DEFAULT_CHUNK_SIZE);
    let python = workspace_cfg
        .python
        .unwrap_or_else(|| DEFAULT_PYTHON.to_string());

    let session_id = uuid::Uuid::new_v4().to_string();
    info!(
        session = %session_id,
        workspace = %workspace.root().display(),
        fast_model = config.fast_llm_model(),
        smart_model = config.smart_llm_model(),
        "Session ready"
    );

    Ok(CommandContext {
        session_id,
        settings: CommandSettings::from_config(config),
        memory: Arc::new(InMemoryStore::new()),
        web_search: Arc::new(DuckDuckGoSearch::new(client.clone())),
        custom_search: Arc::new(GoogleCustomSearch::new(client.clone())),
        scraper: Arc::new(HttpScraper::new(client, user_agent)),
        summarizer: Arc::new(LlmSummarizer::new(
            provider.clone(),
            config.fast_llm_model(),
            chunk_size,
        )),
        code_advisor: Arc::new(LlmCodeAdvisor::new(provider.clone(), config.smart_llm_model())),
        code_runner: Arc::new(PythonRunner::new(workspace.clone(), python)),
        agents: Arc::new(InMemoryAgentManager::new(provider)),
        speech: speech_from_config(config.speech.as_ref()),
        workspace,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskpilot_config::{parse_config, LoggingConfig};

    #[test]
    fn cli_level_overrides_config() {
        let cfg = TaskPilotConfig {
            logging: Some(LoggingConfig {
                level: Some("warn".into()),
                dir: Some("/tmp/tp-logs".into()),
                json: Some(true),
            }),
            ..Default::default()
        };
        let opts = log_options(&cfg, Some("debug"));
        assert_eq!(opts.level, "debug");
        assert_eq!(opts.dir, Some(PathBuf::from("/tmp/tp-logs")));
        assert!(opts.json_console);

        assert_eq!(log_options(&cfg, None).level, "warn");
    }

    #[test]
    fn empty_config_logs_to_console_at_info() {
        let opts = log_options(&TaskPilotConfig::default(), None);
        assert_eq!(opts.level, "info");
        assert!(opts.dir.is_none());
    }

    #[tokio::test]
    async fn context_uses_configured_workspace() {
        let dir = std::env::temp_dir().join(format!("tp-cli-{}", uuid::Uuid::new_v4()));
        let raw = format!("workspace:\n  dir: {}\n", dir.display());
        let cfg = taskpilot_config::apply_all_defaults(parse_config(&raw).unwrap());

        let ctx = build_context(&cfg).await.unwrap();
        assert_eq!(ctx.workspace.root(), dir.as_path());
        assert!(dir.is_dir());
        assert!(!ctx.settings.speak_mode);
        assert_eq!(ctx.settings.fast_model, "gpt-3.5-turbo");

        let _ = std::fs::remove_dir_all(&dir);
    }
}
