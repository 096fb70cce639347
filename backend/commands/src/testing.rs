//! Hand-written collaborator mocks shared by the handler and dispatcher tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{Result, bail};
use async_trait::async_trait;

use taskpilot_core::{
    AgentManager, AgentSummary, CodeAdvisor, CodeRunner, CreatedAgent, CustomSearch, PageScraper,
    SearchError, SearchHit, SpeechOutput, Summarizer, WebSearch,
};
use taskpilot_memory::InMemoryStore;
use taskpilot_tools::Workspace;

use crate::context::{CommandContext, CommandSettings};

pub fn google_error(code: u16, message: &str) -> SearchError {
    SearchError::api(code, message)
}

#[derive(Default)]
pub struct MockWebSearch {
    calls: AtomicUsize,
}

impl MockWebSearch {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WebSearch for MockWebSearch {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let hit = SearchHit {
            title: query.to_string(),
            href: format!("https://ddg.example/{query}"),
            body: "result".to_string(),
        };
        Ok(vec![hit; max_results.min(1)])
    }
}

#[derive(Default)]
pub struct MockCustomSearch {
    calls: AtomicUsize,
    failure: Mutex<Option<SearchError>>,
}

impl MockCustomSearch {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn fail_with(&self, error: SearchError) {
        *self.failure.lock().unwrap() = Some(error);
    }
}

#[async_trait]
impl CustomSearch for MockCustomSearch {
    async fn search(
        &self,
        query: &str,
        _api_key: &str,
        _engine_id: &str,
        _max_results: usize,
    ) -> std::result::Result<Vec<String>, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.failure.lock().unwrap().take() {
            return Err(error);
        }
        Ok(vec![format!("https://google.example/{query}")])
    }
}

/// Serves a fixed page text and `link_count` links.
pub struct MockScraper {
    pub link_count: usize,
}

#[async_trait]
impl PageScraper for MockScraper {
    async fn scrape_text(&self, url: &str) -> Result<String> {
        if url.contains("broken") {
            bail!("HTTP 404 error");
        }
        Ok(format!("Text of {url}"))
    }

    async fn scrape_links(&self, url: &str) -> Result<Vec<String>> {
        Ok((0..self.link_count)
            .map(|i| format!("Link {i} ({url}/{i})"))
            .collect())
    }
}

/// Echoes the question so tests can see what was asked.
#[derive(Default)]
pub struct MockSummarizer {
    pub questions: Mutex<Vec<String>>,
}

#[async_trait]
impl Summarizer for MockSummarizer {
    async fn summarize(&self, text: &str, question: &str) -> Result<String> {
        self.questions.lock().unwrap().push(question.to_string());
        Ok(format!("summary of '{text}'"))
    }
}

pub struct MockAdvisor;

#[async_trait]
impl CodeAdvisor for MockAdvisor {
    async fn evaluate_code(&self, code: &str) -> Result<String> {
        Ok(format!("evaluated {} chars", code.len()))
    }

    async fn improve_code(&self, suggestions: &[String], _code: &str) -> Result<String> {
        Ok(format!("improved with {}", suggestions.join("|")))
    }

    async fn write_tests(&self, _code: &str, focus: &[String]) -> Result<String> {
        Ok(format!("tests focusing on [{}]", focus.join("|")))
    }
}

pub struct MockRunner;

#[async_trait]
impl CodeRunner for MockRunner {
    async fn run_python(&self, file: &str) -> Result<String> {
        if file == "boom.py" {
            panic!("runner exploded");
        }
        Ok(format!("ran {file}"))
    }
}

/// Agent registry that answers every message with a canned reply.
#[derive(Default)]
pub struct MockAgents {
    agents: Mutex<Vec<(String, String)>>,
    next_key: AtomicUsize,
    pub messages: Mutex<Vec<(String, String)>>,
    pub models: Mutex<Vec<String>>,
}

#[async_trait]
impl AgentManager for MockAgents {
    async fn create(&self, task: &str, first_message: &str, model: &str) -> Result<CreatedAgent> {
        let key = self.next_key.fetch_add(1, Ordering::SeqCst).to_string();
        self.agents.lock().unwrap().push((key.clone(), task.to_string()));
        self.models.lock().unwrap().push(model.to_string());
        self.messages
            .lock()
            .unwrap()
            .push((key.clone(), first_message.to_string()));
        Ok(CreatedAgent { key, ack: "Acknowledged".to_string() })
    }

    async fn message(&self, key: &str, message: &str) -> Result<String> {
        if !self.agents.lock().unwrap().iter().any(|(k, _)| k == key) {
            bail!("Agent {key} does not exist");
        }
        self.messages
            .lock()
            .unwrap()
            .push((key.to_string(), message.to_string()));
        Ok(format!("reply to {message}"))
    }

    async fn list(&self) -> Result<Vec<AgentSummary>> {
        Ok(self
            .agents
            .lock()
            .unwrap()
            .iter()
            .map(|(key, task)| AgentSummary { key: key.clone(), task: task.clone() })
            .collect())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let mut agents = self.agents.lock().unwrap();
        let before = agents.len();
        agents.retain(|(k, _)| k != key);
        Ok(agents.len() != before)
    }
}

#[derive(Default)]
pub struct RecordingSpeech {
    pub spoken: Mutex<Vec<(String, usize)>>,
}

#[async_trait]
impl SpeechOutput for RecordingSpeech {
    async fn say(&self, text: &str, voice: usize) -> Result<()> {
        self.spoken.lock().unwrap().push((text.to_string(), voice));
        Ok(())
    }
}

/// A `CommandContext` wired to mocks, with handles to inspect them.
pub struct TestContext {
    pub ctx: CommandContext,
    pub memory: Arc<InMemoryStore>,
    pub web_search: Arc<MockWebSearch>,
    pub custom_search: Arc<MockCustomSearch>,
    pub summarizer: Arc<MockSummarizer>,
    pub agents: Arc<MockAgents>,
    pub speech: Arc<RecordingSpeech>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_links(3)
    }

    pub fn with_links(link_count: usize) -> Self {
        let memory = Arc::new(InMemoryStore::new());
        let web_search = Arc::new(MockWebSearch::default());
        let custom_search = Arc::new(MockCustomSearch::default());
        let summarizer = Arc::new(MockSummarizer::default());
        let agents = Arc::new(MockAgents::default());
        let speech = Arc::new(RecordingSpeech::default());
        let workspace = Workspace::new(
            std::env::temp_dir().join(format!("taskpilot-cmd-{}", uuid::Uuid::new_v4())),
        );

        let ctx = CommandContext {
            session_id: "test-session".to_string(),
            settings: CommandSettings::default(),
            memory: memory.clone(),
            workspace,
            web_search: web_search.clone(),
            custom_search: custom_search.clone(),
            scraper: Arc::new(MockScraper { link_count }),
            summarizer: summarizer.clone(),
            code_advisor: Arc::new(MockAdvisor),
            code_runner: Arc::new(MockRunner),
            agents: agents.clone(),
            speech: speech.clone(),
        };

        Self { ctx, memory, web_search, custom_search, summarizer, agents, speech }
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(self.ctx.workspace.root());
    }
}
