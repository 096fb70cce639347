//! In-memory sub-agent registry backed by a chat-completion provider.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use taskpilot_core::{
    AgentManager, AgentSummary, ChatMessage, CreatedAgent, LlmProvider, LlmRequest,
};

use crate::session_state::AgentSession;

#[derive(Default)]
struct Registry {
    next_key: u64,
    agents: BTreeMap<u64, AgentSession>,
}

/// Keeps every sub-agent conversation for the lifetime of the process.
///
/// The registry lock is never held across a completion call.
pub struct InMemoryAgentManager {
    provider: Arc<dyn LlmProvider>,
    registry: RwLock<Registry>,
}

impl InMemoryAgentManager {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            provider,
            registry: RwLock::new(Registry::default()),
        }
    }

    async fn complete(&self, model: &str, messages: Vec<ChatMessage>) -> Result<String> {
        let request = LlmRequest::new(model, messages);
        Ok(self.provider.complete(&request).await?.content)
    }
}

fn parse_key(key: &str) -> Option<u64> {
    key.trim().parse().ok()
}

#[async_trait]
impl AgentManager for InMemoryAgentManager {
    async fn create(&self, task: &str, first_message: &str, model: &str) -> Result<CreatedAgent> {
        let reply = self
            .complete(model, vec![ChatMessage::user(first_message)])
            .await?;

        let mut session = AgentSession::new(task, model);
        session.record_exchange(first_message, reply.clone());

        let mut registry = self.registry.write().await;
        let key = registry.next_key;
        registry.next_key += 1;
        registry.agents.insert(key, session);
        info!(key, model, "Sub-agent created");

        Ok(CreatedAgent {
            key: key.to_string(),
            ack: reply,
        })
    }

    async fn message(&self, key: &str, message: &str) -> Result<String> {
        let id = parse_key(key).ok_or_else(|| anyhow!("Agent {key} does not exist"))?;
        let (model, mut history) = {
            let registry = self.registry.read().await;
            let session = registry
                .agents
                .get(&id)
                .ok_or_else(|| anyhow!("Agent {key} does not exist"))?;
            (session.model.clone(), session.messages.clone())
        };

        history.push(ChatMessage::user(message));
        debug!(key = id, turns = history.len(), "Messaging sub-agent");
        let reply = self.complete(&model, history).await?;

        // The agent may have been deleted while the completion was in flight.
        let mut registry = self.registry.write().await;
        if let Some(session) = registry.agents.get_mut(&id) {
            session.record_exchange(message, reply.clone());
        }
        Ok(reply)
    }

    async fn list(&self) -> Result<Vec<AgentSummary>> {
        let registry = self.registry.read().await;
        Ok(registry
            .agents
            .iter()
            .map(|(key, session)| AgentSummary {
                key: key.to_string(),
                task: session.task.clone(),
            })
            .collect())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let Some(id) = parse_key(key) else {
            return Ok(false);
        };
        let removed = self.registry.write().await.agents.remove(&id).is_some();
        if removed {
            info!(key = id, "Sub-agent deleted");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskpilot_core::ChatRole;
    use taskpilot_llm::MockProvider;

    #[tokio::test]
    async fn keys_increase_and_history_accumulates() {
        let provider = Arc::new(
            MockProvider::new("mock").with_script(["Acknowledged", "Acknowledged", "poem"]),
        );
        let manager = InMemoryAgentManager::new(provider.clone());

        let first = manager.create("task a", "You are a.", "fast").await.unwrap();
        let second = manager.create("task b", "You are b.", "fast").await.unwrap();
        assert_eq!(first.key, "0");
        assert_eq!(second.key, "1");
        assert_eq!(first.ack, "Acknowledged");

        let reply = manager.message("1", "write a poem").await.unwrap();
        assert_eq!(reply, "poem");

        // Third request carries the full conversation of agent 1.
        let requests = provider.requests();
        let last = &requests[2];
        assert_eq!(last.model, "fast");
        assert_eq!(last.messages.len(), 3);
        assert_eq!(last.messages[1].role, ChatRole::Assistant);
        assert_eq!(last.messages[2].content, "write a poem");
    }

    #[tokio::test]
    async fn list_and_delete() {
        let manager = InMemoryAgentManager::new(Arc::new(MockProvider::new("mock")));
        manager.create("research", "hi", "fast").await.unwrap();

        let listed = manager.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].task, "research");

        assert!(manager.delete("0").await.unwrap());
        assert!(!manager.delete("0").await.unwrap());
        assert!(!manager.delete("not-a-number").await.unwrap());
        assert!(manager.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn deleted_keys_are_not_reused() {
        let manager = InMemoryAgentManager::new(Arc::new(MockProvider::new("mock")));
        manager.create("a", "hi", "fast").await.unwrap();
        manager.delete("0").await.unwrap();
        let next = manager.create("b", "hi", "fast").await.unwrap();
        assert_eq!(next.key, "1");
    }

    #[tokio::test]
    async fn messaging_unknown_agent_fails() {
        let manager = InMemoryAgentManager::new(Arc::new(MockProvider::new("mock")));
        let err = manager.message("7", "hello").await.unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
