use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use crate::context::CommandContext;
use crate::dispatch::CommandHandler;
use crate::error::{CommandError, CommandResult};
use crate::handlers::pretty_json;
use crate::types::CommandOutcome;

const INVALID_GOOGLE_KEY: &str = "The provided Google API key is invalid or missing.";

#[derive(Debug, Deserialize)]
pub struct SearchArgs {
    pub input: String,
}

/// `google`: Custom Search when a key is configured, DuckDuckGo otherwise.
pub struct GoogleHandler;

#[async_trait]
impl CommandHandler for GoogleHandler {
    type Args = SearchArgs;

    async fn handle(&self, ctx: &CommandContext, args: SearchArgs) -> CommandResult {
        let num = ctx.settings.num_results;
        let Some((key, engine_id)) = ctx.settings.google_credentials() else {
            info!(query = %args.input, "Searching with DuckDuckGo");
            let hits = ctx.web_search.search(&args.input, num).await?;
            return Ok(CommandOutcome::Reply(pretty_json(&hits)?));
        };

        info!(query = %args.input, "Searching with Google Custom Search");
        match ctx.custom_search.search(&args.input, key, engine_id, num).await {
            Ok(links) => Ok(CommandOutcome::Reply(pretty_json(&links)?)),
            Err(e) if e.is_invalid_api_key() => {
                Err(CommandError::Handler(anyhow::anyhow!(INVALID_GOOGLE_KEY)))
            }
            Err(e) => Err(CommandError::Handler(e.into())),
        }
    }
}
