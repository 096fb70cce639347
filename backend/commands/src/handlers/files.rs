use async_trait::async_trait;
use serde::Deserialize;

use crate::context::CommandContext;
use crate::dispatch::CommandHandler;
use crate::error::CommandResult;
use crate::types::CommandOutcome;

#[derive(Debug, Deserialize)]
pub struct FileTextArgs {
    pub file: String,
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct FileArgs {
    pub file: String,
}

/// `write_to_file`
pub struct WriteFileHandler;

#[async_trait]
impl CommandHandler for WriteFileHandler {
    type Args = FileTextArgs;

    async fn handle(&self, ctx: &CommandContext, args: FileTextArgs) -> CommandResult {
        ctx.workspace.write(&args.file, &args.text).await?;
        Ok(CommandOutcome::reply("File written to successfully."))
    }
}

/// `read_file`
pub struct ReadFileHandler;

#[async_trait]
impl CommandHandler for ReadFileHandler {
    type Args = FileArgs;

    async fn handle(&self, ctx: &CommandContext, args: FileArgs) -> CommandResult {
        Ok(CommandOutcome::Reply(ctx.workspace.read(&args.file).await?))
    }
}

/// `append_to_file`
pub struct AppendFileHandler;

#[async_trait]
impl CommandHandler for AppendFileHandler {
    type Args = FileTextArgs;

    async fn handle(&self, ctx: &CommandContext, args: FileTextArgs) -> CommandResult {
        ctx.workspace.append(&args.file, &args.text).await?;
        Ok(CommandOutcome::reply("Text appended successfully."))
    }
}

/// `delete_file`
pub struct DeleteFileHandler;

#[async_trait]
impl CommandHandler for DeleteFileHandler {
    type Args = FileArgs;

    async fn handle(&self, ctx: &CommandContext, args: FileArgs) -> CommandResult {
        ctx.workspace.delete(&args.file).await?;
        Ok(CommandOutcome::reply("File deleted successfully."))
    }
}
