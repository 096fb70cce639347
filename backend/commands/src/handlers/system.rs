use async_trait::async_trait;
use chrono::Local;
use serde::Deserialize;
use tracing::info;

use crate::context::CommandContext;
use crate::dispatch::CommandHandler;
use crate::error::CommandResult;
use crate::types::{CommandOutcome, NoArgs};

#[derive(Debug, Default, Deserialize)]
pub struct TaskCompleteArgs {
    #[serde(default)]
    pub reason: Option<String>,
}

/// `get_datetime`
pub struct DateTimeHandler;

#[async_trait]
impl CommandHandler for DateTimeHandler {
    type Args = NoArgs;

    async fn handle(&self, _ctx: &CommandContext, _args: NoArgs) -> CommandResult {
        Ok(CommandOutcome::Reply(format!(
            "Current date and time: {}",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        )))
    }
}

/// `task_complete`: ask the host to shut down.
pub struct TaskCompleteHandler;

#[async_trait]
impl CommandHandler for TaskCompleteHandler {
    type Args = TaskCompleteArgs;

    async fn handle(&self, _ctx: &CommandContext, args: TaskCompleteArgs) -> CommandResult {
        let reason = args.reason.filter(|r| !r.trim().is_empty());
        info!(reason = reason.as_deref().unwrap_or(""), "Task complete, shutdown requested");
        Ok(CommandOutcome::Shutdown { reason })
    }
}
