use std::collections::VecDeque;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use taskpilot_core::{LlmProvider, LlmRequest, LlmResponse};

/// A mock LLM provider that replays scripted responses and records requests.
///
/// Once the script is exhausted it keeps returning the fallback response.
pub struct MockProvider {
    name: String,
    script: Mutex<VecDeque<String>>,
    fallback: String,
    requests: Mutex<Vec<LlmRequest>>,
}

impl MockProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            script: Mutex::new(VecDeque::new()),
            fallback: "Mock response".to_string(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Response returned once the script runs out.
    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.fallback = response.into();
        self
    }

    /// Queue responses returned in order.
    pub fn with_script<I, S>(self, responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .extend(responses.into_iter().map(Into::into));
        self
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, req: &LlmRequest) -> Result<LlmResponse> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(req.clone());
        let content = self
            .script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        Ok(LlmResponse {
            content,
            provider: self.name.clone(),
            model: req.model.clone(),
            tokens_used: 0,
            latency_ms: 0,
        })
    }
}
