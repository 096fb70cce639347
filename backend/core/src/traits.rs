use anyhow::Result;
use async_trait::async_trait;

use crate::error::SearchError;
use crate::types::{AgentSummary, ChatMessage, CreatedAgent, SearchHit};

/// Trait for chat-completion providers backing the summarizer, code advisor,
/// and sub-agents.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name (e.g., "openai", "mock").
    fn name(&self) -> &str;

    /// Send a completion request and return the response text.
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse>;
}

/// Request to an LLM provider.
#[derive(Debug, Clone)]
pub struct LlmRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: Option<u32>,
    pub temperature: f32,
}

impl LlmRequest {
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            max_tokens: None,
            temperature: 0.0,
        }
    }

    /// Single system + user turn.
    pub fn prompt(model: impl Into<String>, system: impl Into<String>, user: impl Into<String>) -> Self {
        Self::new(model, vec![ChatMessage::system(system), ChatMessage::user(user)])
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Response from an LLM provider.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub content: String,
    pub provider: String,
    pub model: String,
    pub tokens_used: u64,
    pub latency_ms: u64,
}

// ---------------------------------------------------------------------------
// Collaborators invoked by command handlers
// ---------------------------------------------------------------------------

/// Unauthenticated web search.
#[async_trait]
pub trait WebSearch: Send + Sync {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>>;
}

/// Authenticated search returning result URLs.
#[async_trait]
pub trait CustomSearch: Send + Sync {
    async fn search(
        &self,
        query: &str,
        api_key: &str,
        engine_id: &str,
        max_results: usize,
    ) -> std::result::Result<Vec<String>, SearchError>;
}

/// Fetches a page and extracts its readable text or hyperlinks.
#[async_trait]
pub trait PageScraper: Send + Sync {
    async fn scrape_text(&self, url: &str) -> Result<String>;

    /// Links in document order, formatted as `text (url)`.
    async fn scrape_links(&self, url: &str) -> Result<Vec<String>>;
}

#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Summarize `text`, answering `question` when the text allows it.
    async fn summarize(&self, text: &str, question: &str) -> Result<String>;
}

/// Code review helpers backed by a language model.
#[async_trait]
pub trait CodeAdvisor: Send + Sync {
    async fn evaluate_code(&self, code: &str) -> Result<String>;
    async fn improve_code(&self, suggestions: &[String], code: &str) -> Result<String>;
    async fn write_tests(&self, code: &str, focus: &[String]) -> Result<String>;
}

#[async_trait]
pub trait CodeRunner: Send + Sync {
    /// Run a Python file (relative to the workspace) and return its output.
    async fn run_python(&self, file: &str) -> Result<String>;
}

/// Registry of sub-agents with their own conversation state.
#[async_trait]
pub trait AgentManager: Send + Sync {
    async fn create(&self, task: &str, first_message: &str, model: &str) -> Result<CreatedAgent>;
    async fn message(&self, key: &str, message: &str) -> Result<String>;
    async fn list(&self) -> Result<Vec<AgentSummary>>;
    /// Returns false when no agent is registered under `key`.
    async fn delete(&self, key: &str) -> Result<bool>;
}

#[async_trait]
pub trait SpeechOutput: Send + Sync {
    /// Speak `text` with the voice at index `voice`.
    async fn say(&self, text: &str, voice: usize) -> Result<()>;
}
