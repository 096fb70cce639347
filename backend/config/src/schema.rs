//! TaskPilot runtime configuration schema.
//!
//! Every section and field is optional in the file; `defaults::apply_all_defaults`
//! fills in what the runtime needs.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Root configuration for TaskPilot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPilotConfig {
    /// Chat-completion provider used by the summarizer, code advisor, and sub-agents
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm: Option<LlmConfig>,

    /// Search providers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<SearchConfig>,

    /// Page fetching and summarization
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browse: Option<BrowseConfig>,

    /// Directory that file and code-execution commands are confined to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace: Option<WorkspaceConfig>,

    /// Spoken output ("speak mode")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speech: Option<SpeechConfig>,

    /// Logging configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

impl TaskPilotConfig {
    pub fn fast_llm_model(&self) -> &str {
        self.llm
            .as_ref()
            .and_then(|l| l.fast_model.as_deref())
            .unwrap_or(crate::defaults::DEFAULT_FAST_MODEL)
    }

    pub fn smart_llm_model(&self) -> &str {
        self.llm
            .as_ref()
            .and_then(|l| l.smart_model.as_deref())
            .unwrap_or(crate::defaults::DEFAULT_SMART_MODEL)
    }

    /// Google API key, only when set to something other than whitespace.
    pub fn google_api_key(&self) -> Option<&str> {
        self.search
            .as_ref()
            .and_then(|s| s.google_api_key.as_deref())
            .filter(|k| !k.trim().is_empty())
    }

    pub fn custom_search_engine_id(&self) -> Option<&str> {
        self.search
            .as_ref()
            .and_then(|s| s.custom_search_engine_id.as_deref())
    }

    pub fn search_results(&self) -> usize {
        self.search
            .as_ref()
            .and_then(|s| s.num_results)
            .unwrap_or(crate::defaults::DEFAULT_SEARCH_RESULTS)
    }

    pub fn speak_mode(&self) -> bool {
        self.speech.as_ref().and_then(|s| s.enabled).unwrap_or(false)
    }

    pub fn workspace_dir(&self) -> &str {
        self.workspace
            .as_ref()
            .and_then(|w| w.dir.as_deref())
            .unwrap_or(crate::defaults::DEFAULT_WORKSPACE_DIR)
    }
}

// ---------------------------------------------------------------------------
// LLM
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// OpenAI-compatible endpoint, e.g. `https://api.openai.com/v1`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Model for sub-agents and summaries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fast_model: Option<String>,
    /// Model for code analysis
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smart_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchConfig {
    /// Enables Google Custom Search when non-blank
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_search_engine_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_results: Option<usize>,
}

// ---------------------------------------------------------------------------
// Browse
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowseConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// Max characters per chunk handed to the summarizer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_size: Option<usize>,
}

// ---------------------------------------------------------------------------
// Workspace
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
    /// Interpreter used by `execute_python_file`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub python: Option<String>,
}

// ---------------------------------------------------------------------------
// Speech
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechConfig {
    /// Speak mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// "log" | "openai" | "elevenlabs"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Voice ids indexed by the voice number handlers pass
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub voices: Vec<String>,
    /// Where synthesized audio is written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<String>,
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Directory for the rolling NDJSON log; console only when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_yaml() {
        let yaml = r#"
llm:
  fastModel: gpt-4o-mini
search:
  googleApiKey: abc
  customSearchEngineId: cx1
  numResults: 3
speech:
  enabled: true
  voices: [a, b]
"#;
        let cfg: TaskPilotConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.fast_llm_model(), "gpt-4o-mini");
        assert_eq!(cfg.google_api_key(), Some("abc"));
        assert_eq!(cfg.custom_search_engine_id(), Some("cx1"));
        assert_eq!(cfg.search_results(), 3);
        assert!(cfg.speak_mode());
        assert_eq!(cfg.speech.unwrap().voices, vec!["a", "b"]);
    }

    #[test]
    fn blank_google_key_is_treated_as_absent() {
        let cfg = TaskPilotConfig {
            search: Some(SearchConfig {
                google_api_key: Some("   ".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(cfg.google_api_key(), None);
    }

    #[test]
    fn accessors_fall_back_to_defaults() {
        let cfg = TaskPilotConfig::default();
        assert_eq!(cfg.fast_llm_model(), crate::defaults::DEFAULT_FAST_MODEL);
        assert_eq!(cfg.smart_llm_model(), crate::defaults::DEFAULT_SMART_MODEL);
        assert_eq!(cfg.search_results(), crate::defaults::DEFAULT_SEARCH_RESULTS);
        assert!(!cfg.speak_mode());
    }
}
