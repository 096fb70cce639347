use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use crate::context::CommandContext;
use crate::dispatch::CommandHandler;
use crate::error::CommandResult;
use crate::types::{CommandOutcome, NoArgs, string_or_number};

/// Voice index used for sub-agent speech.
const AGENT_VOICE: usize = 1;
/// Voice used when briefing a sub-agent.
const DEFAULT_VOICE: usize = 0;

#[derive(Debug, Deserialize)]
pub struct StartAgentArgs {
    pub name: String,
    pub task: String,
    pub prompt: String,
}

#[derive(Debug, Deserialize)]
pub struct MessageAgentArgs {
    #[serde(deserialize_with = "string_or_number")]
    pub key: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct AgentKeyArgs {
    #[serde(deserialize_with = "string_or_number")]
    pub key: String,
}

/// `start_agent`: create a sub-agent on the fast model, then hand it the prompt.
pub struct StartAgentHandler;

#[async_trait]
impl CommandHandler for StartAgentHandler {
    type Args = StartAgentArgs;

    async fn handle(&self, ctx: &CommandContext, args: StartAgentArgs) -> CommandResult {
        let voice_name = args.name.replace('_', " ");
        ctx.speak(&format!("{voice_name} here, Reporting for duty!"), AGENT_VOICE)
            .await;

        let first_message = format!("You are {}.  Respond with: \"Acknowledged\".", args.name);
        let created = ctx
            .agents
            .create(&args.task, &first_message, &ctx.settings.fast_model)
            .await?;
        info!(name = %args.name, key = %created.key, "Started sub-agent");

        ctx.speak(
            &format!("Hello {voice_name}. Your task is as follows. {}.", args.task),
            DEFAULT_VOICE,
        )
        .await;

        let reply = ctx.agents.message(&created.key, &args.prompt).await?;
        Ok(CommandOutcome::Reply(format!(
            "Agent {} created with key {}. First response: {reply}",
            args.name, created.key
        )))
    }
}

/// `message_agent`
pub struct MessageAgentHandler;

#[async_trait]
impl CommandHandler for MessageAgentHandler {
    type Args = MessageAgentArgs;

    async fn handle(&self, ctx: &CommandContext, args: MessageAgentArgs) -> CommandResult {
        let reply = ctx.agents.message(&args.key, &args.message).await?;
        ctx.speak(&reply, AGENT_VOICE).await;
        Ok(CommandOutcome::Reply(format!(
            "Agent {} responded: {reply}",
            args.key
        )))
    }
}

/// `list_agents`
pub struct ListAgentsHandler;

#[async_trait]
impl CommandHandler for ListAgentsHandler {
    type Args = NoArgs;

    async fn handle(&self, ctx: &CommandContext, _args: NoArgs) -> CommandResult {
        let agents = ctx.agents.list().await?;
        if agents.is_empty() {
            return Ok(CommandOutcome::reply("No agents running."));
        }
        let lines = agents
            .iter()
            .map(|a| format!("{}: {}", a.key, a.task))
            .collect::<Vec<_>>()
            .join("\n");
        Ok(CommandOutcome::Reply(lines))
    }
}

/// `delete_agent`
pub struct DeleteAgentHandler;

#[async_trait]
impl CommandHandler for DeleteAgentHandler {
    type Args = AgentKeyArgs;

    async fn handle(&self, ctx: &CommandContext, args: AgentKeyArgs) -> CommandResult {
        let text = if ctx.agents.delete(&args.key).await? {
            format!("Agent {} deleted.", args.key)
        } else {
            format!("Agent {} does not exist.", args.key)
        };
        Ok(CommandOutcome::Reply(text))
    }
}
