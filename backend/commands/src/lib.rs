//! TaskPilot directive dispatcher.
//!
//! Raw model output goes through `parse_directive`, the command name is
//! looked up among registered handlers, arguments are validated into the
//! handler's typed record, and the handler runs against the collaborators in
//! `CommandContext`. Every failure comes back as a tagged `CommandError`.

pub mod context;
pub mod dispatch;
pub mod error;
pub mod handlers;
pub mod parser;
pub mod registry;
pub mod types;

#[cfg(test)]
mod testing;

pub use context::{CommandContext, CommandSettings};
pub use dispatch::{CommandDispatcher, CommandHandler};
pub use error::{CommandError, CommandResult, ErrorKind, ParseError, Report};
pub use parser::{parse_directive, parse_json_lenient, repair_json};
pub use registry::{builtin_commands, CommandRegistry};
pub use types::{ArgSpec, CommandDescriptor, CommandOutcome, ParsedDirective, StringList};

use handlers::*;

/// Build a dispatcher pre-wired with all built-in handlers.
pub fn build_default_dispatcher() -> CommandDispatcher {
    let mut dispatcher = CommandDispatcher::new(CommandRegistry::builtin());

    dispatcher.register("google", GoogleHandler);
    dispatcher.register("memory_add", MemoryAddHandler);
    dispatcher.register("memory_del", MemoryDeleteHandler);
    dispatcher.register("memory_ovr", MemoryOverwriteHandler);
    dispatcher.register("browse_website", BrowseWebsiteHandler);
    dispatcher.register("start_agent", StartAgentHandler);
    dispatcher.register("message_agent", MessageAgentHandler);
    dispatcher.register("list_agents", ListAgentsHandler);
    dispatcher.register("delete_agent", DeleteAgentHandler);
    dispatcher.register("write_to_file", WriteFileHandler);
    dispatcher.register("read_file", ReadFileHandler);
    dispatcher.register("append_to_file", AppendFileHandler);
    dispatcher.register("delete_file", DeleteFileHandler);
    dispatcher.register("evaluate_code", EvaluateCodeHandler);
    dispatcher.register("improve_code", ImproveCodeHandler);
    dispatcher.register("write_tests", WriteTestsHandler);
    dispatcher.register("execute_python_file", ExecutePythonHandler);
    dispatcher.register("task_complete", TaskCompleteHandler);
    dispatcher.register("get_datetime", DateTimeHandler);
    dispatcher.register("get_url_text_summary", UrlTextSummaryHandler);
    dispatcher.register("get_hyperlinks", HyperlinksHandler);

    dispatcher
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestContext;
    use serde_json::{Map, json};
    use taskpilot_memory::MemoryStore;

    fn args(value: serde_json::Value) -> Map<String, serde_json::Value> {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("args must be an object"),
        }
    }

    #[test]
    fn every_builtin_command_has_a_handler() {
        let dispatcher = build_default_dispatcher();
        for descriptor in dispatcher.registry().descriptors() {
            assert!(dispatcher.has_handler(descriptor.name), "{}", descriptor.name);
        }
    }

    #[tokio::test]
    async fn unknown_command_is_lookup_error() {
        let t = TestContext::new();
        let err = build_default_dispatcher()
            .execute(&t.ctx, "fly_to_moon", Map::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Lookup);
        assert!(err.report().starts_with("Error: Unknown command 'fly_to_moon'"));
    }

    #[tokio::test]
    async fn missing_arguments_fail_before_handler() {
        let t = TestContext::new();
        let err = build_default_dispatcher()
            .execute(&t.ctx, "memory_add", args(json!({"key": "k"})))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert!(matches!(err, CommandError::InvalidArguments { ref command, .. } if command == "memory_add"));
        assert!(t.memory.is_empty());
    }

    #[tokio::test]
    async fn ill_typed_arguments_are_rejected() {
        let t = TestContext::new();
        let err = build_default_dispatcher()
            .execute(&t.ctx, "read_file", args(json!({"file": ["a", "b"]})))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[tokio::test]
    async fn handler_panics_are_contained() {
        let t = TestContext::new();
        let err = build_default_dispatcher()
            .execute(&t.ctx, "execute_python_file", args(json!({"file": "boom.py"})))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Handler);
        assert!(err.report().contains("runner exploded"));
    }

    #[tokio::test]
    async fn execute_text_end_to_end() {
        let t = TestContext::new();
        let dispatcher = build_default_dispatcher();

        let raw = "```json\n{\"command\": {\"name\": \"memory_add\", \"args\": {\"key\": \"plan\", \"value\": \"v1\",}}}\n```";
        let out = dispatcher.execute_text(&t.ctx, raw).await;
        assert_eq!(out.report(), "Committing memory (key:value) \"plan\":\"v1\"");
        assert_eq!(t.memory.get("plan").as_deref(), Some("v1"));

        let out = dispatcher
            .execute_text(&t.ctx, r#"{"command": {"name": "memory_del", "args": {"key": "nope"}}}"#)
            .await;
        assert_eq!(out.as_ref().unwrap_err().kind(), ErrorKind::State);
        assert!(out.report().starts_with("Error: "));
    }

    #[tokio::test]
    async fn execute_text_parse_failures() {
        let t = TestContext::new();
        let dispatcher = build_default_dispatcher();
        let out = dispatcher.execute_text(&t.ctx, "I am not sure what to do").await;
        assert_eq!(out.report(), "Error: Invalid JSON");

        let out = dispatcher.execute_text(&t.ctx, r#"{"thoughts": {}}"#).await;
        assert_eq!(out.report(), "Error: Missing 'command' object in JSON");
    }

    #[tokio::test]
    async fn args_less_directive_runs() {
        let t = TestContext::new();
        let out = build_default_dispatcher()
            .execute_text(&t.ctx, r#"{"command": {"name": "list_agents"}}"#)
            .await
            .unwrap();
        assert_eq!(out.report(), "No agents running.");
    }

    #[tokio::test]
    async fn task_complete_returns_shutdown() {
        let t = TestContext::new();
        let out = build_default_dispatcher()
            .execute_text(
                &t.ctx,
                r#"{"command": {"name": "task_complete", "args": {"reason": "done"}}}"#,
            )
            .await
            .unwrap();
        assert!(out.is_shutdown());
    }
}
