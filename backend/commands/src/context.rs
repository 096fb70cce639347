//! Everything a handler may touch: collaborators, memory, and settings.

use std::sync::Arc;

use taskpilot_config::TaskPilotConfig;
use taskpilot_core::{
    AgentManager, CodeAdvisor, CodeRunner, CustomSearch, PageScraper, SpeechOutput, Summarizer,
    WebSearch,
};
use taskpilot_memory::MemoryStore;
use taskpilot_tools::Workspace;

/// Configuration values handlers read.
#[derive(Debug, Clone)]
pub struct CommandSettings {
    pub google_api_key: Option<String>,
    pub custom_search_engine_id: Option<String>,
    pub num_results: usize,
    pub speak_mode: bool,
    /// Model new sub-agents run on.
    pub fast_model: String,
}

impl CommandSettings {
    pub fn from_config(config: &TaskPilotConfig) -> Self {
        Self {
            google_api_key: config.google_api_key().map(str::to_string),
            custom_search_engine_id: config.custom_search_engine_id().map(str::to_string),
            num_results: config.search_results(),
            speak_mode: config.speak_mode(),
            fast_model: config.fast_llm_model().to_string(),
        }
    }

    /// Google credentials, present only when the key is non-blank.
    pub fn google_credentials(&self) -> Option<(&str, &str)> {
        let key = self.google_api_key.as_deref().filter(|k| !k.trim().is_empty())?;
        Some((key, self.custom_search_engine_id.as_deref().unwrap_or("")))
    }
}

impl Default for CommandSettings {
    fn default() -> Self {
        Self::from_config(&TaskPilotConfig::default())
    }
}

/// Context passed to every command handler.
#[derive(Clone)]
pub struct CommandContext {
    /// Journal key for directive events.
    pub session_id: String,
    pub settings: CommandSettings,
    pub memory: Arc<dyn MemoryStore>,
    pub workspace: Workspace,
    pub web_search: Arc<dyn WebSearch>,
    pub custom_search: Arc<dyn CustomSearch>,
    pub scraper: Arc<dyn PageScraper>,
    pub summarizer: Arc<dyn Summarizer>,
    pub code_advisor: Arc<dyn CodeAdvisor>,
    pub code_runner: Arc<dyn CodeRunner>,
    pub agents: Arc<dyn AgentManager>,
    pub speech: Arc<dyn SpeechOutput>,
}

impl CommandContext {
    /// Speak through the configured voice when speak mode is on; failures are only logged.
    pub async fn speak(&self, text: &str, voice: usize) {
        if !self.settings.speak_mode {
            return;
        }
        if let Err(e) = self.speech.say(text, voice).await {
            tracing::warn!(error = %e, "Speech output failed");
        }
    }
}
