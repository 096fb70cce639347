use async_trait::async_trait;
use serde::Deserialize;

use crate::context::CommandContext;
use crate::dispatch::CommandHandler;
use crate::error::CommandResult;
use crate::types::{CommandOutcome, StringList};

#[derive(Debug, Deserialize)]
pub struct CodeArgs {
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct ImproveCodeArgs {
    pub suggestions: StringList,
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct WriteTestsArgs {
    pub code: String,
    #[serde(default)]
    pub focus: StringList,
}

#[derive(Debug, Deserialize)]
pub struct ExecuteArgs {
    pub file: String,
}

/// `evaluate_code`
pub struct EvaluateCodeHandler;

#[async_trait]
impl CommandHandler for EvaluateCodeHandler {
    type Args = CodeArgs;

    async fn handle(&self, ctx: &CommandContext, args: CodeArgs) -> CommandResult {
        Ok(CommandOutcome::Reply(ctx.code_advisor.evaluate_code(&args.code).await?))
    }
}

/// `improve_code`
pub struct ImproveCodeHandler;

#[async_trait]
impl CommandHandler for ImproveCodeHandler {
    type Args = ImproveCodeArgs;

    async fn handle(&self, ctx: &CommandContext, args: ImproveCodeArgs) -> CommandResult {
        let suggestions = args.suggestions.into_vec();
        Ok(CommandOutcome::Reply(
            ctx.code_advisor.improve_code(&suggestions, &args.code).await?,
        ))
    }
}

/// `write_tests`
pub struct WriteTestsHandler;

#[async_trait]
impl CommandHandler for WriteTestsHandler {
    type Args = WriteTestsArgs;

    async fn handle(&self, ctx: &CommandContext, args: WriteTestsArgs) -> CommandResult {
        let focus = args.focus.into_vec();
        Ok(CommandOutcome::Reply(
            ctx.code_advisor.write_tests(&args.code, &focus).await?,
        ))
    }
}

/// `execute_python_file`
pub struct ExecutePythonHandler;

#[async_trait]
impl CommandHandler for ExecutePythonHandler {
    type Args = ExecuteArgs;

    async fn handle(&self, ctx: &CommandContext, args: ExecuteArgs) -> CommandResult {
        Ok(CommandOutcome::Reply(ctx.code_runner.run_python(&args.file).await?))
    }
}
