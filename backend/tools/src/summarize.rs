//! Question-focused summarization of long page text through an LLM.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use taskpilot_core::{ChatMessage, LlmProvider, LlmRequest, Summarizer};

/// Split `text` into chunks of at most `max_len` bytes, breaking on line boundaries.
///
/// A single line longer than `max_len` is cut at char boundaries.
pub fn split_text(text: &str, max_len: usize) -> Vec<String> {
    let max_len = max_len.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();

    for line in text.lines() {
        let mut line = line;
        while line.len() > max_len {
            let mut cut = max_len;
            while !line.is_char_boundary(cut) {
                cut -= 1;
            }
            if cut == 0 {
                cut = line.char_indices().nth(1).map_or(line.len(), |(i, _)| i);
            }
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            chunks.push(line[..cut].to_string());
            line = &line[cut..];
        }
        let needed = if current.is_empty() { line.len() } else { current.len() + 1 + line.len() };
        if needed > max_len && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push('\n');
        }
        current.push_str(line);
    }
    if !current.trim().is_empty() {
        chunks.push(current);
    }
    chunks
}

fn summary_prompt(text: &str, question: &str) -> String {
    format!(
        "\"\"\"{text}\"\"\" Using the above text, please answer the following question: \"{question}\" -- if the question cannot be answered using the text, please summarize the text."
    )
}

/// Summarizes each chunk against the question, then merges chunk summaries.
pub struct LlmSummarizer {
    provider: Arc<dyn LlmProvider>,
    model: String,
    chunk_size: usize,
}

impl LlmSummarizer {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>, chunk_size: usize) -> Self {
        Self {
            provider,
            model: model.into(),
            chunk_size,
        }
    }

    async fn ask(&self, text: &str, question: &str) -> Result<String> {
        let request = LlmRequest::new(
            self.model.clone(),
            vec![ChatMessage::user(summary_prompt(text, question))],
        )
        .with_max_tokens(300);
        Ok(self.provider.complete(&request).await?.content)
    }
}

#[async_trait]
impl Summarizer for LlmSummarizer {
    async fn summarize(&self, text: &str, question: &str) -> Result<String> {
        if text.trim().is_empty() {
            return Ok("Error: No text to summarize".to_string());
        }
        let chunks = split_text(text, self.chunk_size);
        debug!(chunks = chunks.len(), "Summarizing text");

        let mut summaries = Vec::with_capacity(chunks.len());
        for chunk in &chunks {
            summaries.push(self.ask(chunk, question).await?);
        }
        if summaries.len() == 1 {
            return Ok(summaries.remove(0));
        }
        self.ask(&summaries.join("\n"), question).await
    }
}
