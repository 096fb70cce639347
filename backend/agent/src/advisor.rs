//! Code review helpers that ask the model to behave like a typed function.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use taskpilot_core::{ChatMessage, CodeAdvisor, LlmProvider, LlmRequest};

/// A function signature and docstring the model is asked to impersonate.
#[derive(Debug, Clone, Copy)]
pub struct AiFunction {
    pub signature: &'static str,
    pub description: &'static str,
}

impl AiFunction {
    pub const ANALYZE_CODE: AiFunction = AiFunction {
        signature: "def analyze_code(code: str) -> List[str]:",
        description: "Analyzes the given code and returns a list of suggestions for improvements.",
    };
    pub const IMPROVE_CODE: AiFunction = AiFunction {
        signature: "def generate_improved_code(suggestions: List[str], code: str) -> str:",
        description: "Improves the provided code based on the suggestions provided, making no other changes.",
    };
    pub const WRITE_TESTS: AiFunction = AiFunction {
        signature: "def create_test_cases(code: str, focus: Optional[str] = None) -> str:",
        description: "Generates test cases for the existing code, focusing on specific areas if required.",
    };

    /// Chat messages invoking this function with already-rendered arguments.
    pub fn messages(&self, args: &[String]) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(format!(
                "You are now the following python function: ```# {}\n{}```\n\nOnly respond with your `return` value.",
                self.description, self.signature
            )),
            ChatMessage::user(args.join(", ")),
        ]
    }
}

/// Python literal for a string argument.
fn py_str(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("{value:?}"))
}

fn py_list(values: &[String]) -> String {
    serde_json::to_string(values).unwrap_or_else(|_| "[]".to_string())
}

/// `CodeAdvisor` backed by the smart model at temperature zero.
pub struct LlmCodeAdvisor {
    provider: Arc<dyn LlmProvider>,
    model: String,
}

impl LlmCodeAdvisor {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    async fn call(&self, function: AiFunction, args: Vec<String>) -> Result<String> {
        debug!(function = function.signature, "Calling AI function");
        let request = LlmRequest::new(self.model.clone(), function.messages(&args))
            .with_temperature(0.0);
        Ok(self.provider.complete(&request).await?.content)
    }
}

#[async_trait]
impl CodeAdvisor for LlmCodeAdvisor {
    async fn evaluate_code(&self, code: &str) -> Result<String> {
        self.call(AiFunction::ANALYZE_CODE, vec![py_str(code)]).await
    }

    async fn improve_code(&self, suggestions: &[String], code: &str) -> Result<String> {
        self.call(AiFunction::IMPROVE_CODE, vec![py_list(suggestions), py_str(code)])
            .await
    }

    async fn write_tests(&self, code: &str, focus: &[String]) -> Result<String> {
        self.call(AiFunction::WRITE_TESTS, vec![py_str(code), py_list(focus)])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskpilot_core::ChatRole;
    use taskpilot_llm::MockProvider;

    #[test]
    fn function_prompt_shape() {
        let messages = AiFunction::ANALYZE_CODE.messages(&["\"x = 1\"".to_string()]);
        assert_eq!(messages[0].role, ChatRole::System);
        assert!(messages[0].content.contains("def analyze_code(code: str) -> List[str]:"));
        assert!(messages[0].content.ends_with("Only respond with your `return` value."));
        assert_eq!(messages[1].content, "\"x = 1\"");
    }

    #[tokio::test]
    async fn improve_code_renders_arguments() {
        let provider = Arc::new(MockProvider::new("mock").with_response("better code"));
        let advisor = LlmCodeAdvisor::new(provider.clone(), "smart");

        let out = advisor
            .improve_code(&["use snake_case".to_string()], "def F(): pass")
            .await
            .unwrap();
        assert_eq!(out, "better code");

        let request = &provider.requests()[0];
        assert_eq!(request.model, "smart");
        assert_eq!(request.temperature, 0.0);
        assert_eq!(
            request.messages[1].content,
            "[\"use snake_case\"], \"def F(): pass\""
        );
    }

    #[tokio::test]
    async fn write_tests_passes_focus() {
        let provider = Arc::new(MockProvider::new("mock"));
        let advisor = LlmCodeAdvisor::new(provider.clone(), "smart");
        advisor.write_tests("code", &[]).await.unwrap();
        assert_eq!(provider.requests()[0].messages[1].content, "\"code\", []");
    }
}
