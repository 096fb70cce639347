use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use crate::context::CommandContext;
use crate::dispatch::CommandHandler;
use crate::error::CommandResult;
use crate::handlers::pretty_json;
use crate::types::CommandOutcome;

/// Question used when the directive does not ask anything specific.
pub const DEFAULT_SUMMARY_QUESTION: &str = "Make an executive summary.";

/// Links kept in a `browse_website` reply.
pub const BROWSE_LINK_LIMIT: usize = 5;

#[derive(Debug, Deserialize)]
pub struct PageArgs {
    pub url: String,
    #[serde(default)]
    pub question: Option<String>,
}

impl PageArgs {
    fn question(&self) -> &str {
        self.question
            .as_deref()
            .filter(|q| !q.trim().is_empty())
            .unwrap_or(DEFAULT_SUMMARY_QUESTION)
    }
}

#[derive(Debug, Deserialize)]
pub struct UrlArgs {
    pub url: String,
}

async fn summarize_page(ctx: &CommandContext, args: &PageArgs) -> anyhow::Result<String> {
    let text = ctx.scraper.scrape_text(&args.url).await?;
    ctx.summarizer.summarize(&text, args.question()).await
}

/// `browse_website`: summary plus the first few links.
pub struct BrowseWebsiteHandler;

#[async_trait]
impl CommandHandler for BrowseWebsiteHandler {
    type Args = PageArgs;

    async fn handle(&self, ctx: &CommandContext, args: PageArgs) -> CommandResult {
        info!(url = %args.url, "Browsing website");
        let summary = summarize_page(ctx, &args).await?;
        let mut links = ctx.scraper.scrape_links(&args.url).await?;
        links.truncate(BROWSE_LINK_LIMIT);
        Ok(CommandOutcome::Reply(format!(
            "Website Content Summary: {summary}\n\nLinks: {}",
            serde_json::Value::from(links)
        )))
    }
}

/// `get_url_text_summary`
pub struct UrlTextSummaryHandler;

#[async_trait]
impl CommandHandler for UrlTextSummaryHandler {
    type Args = PageArgs;

    async fn handle(&self, ctx: &CommandContext, args: PageArgs) -> CommandResult {
        let summary = summarize_page(ctx, &args).await?;
        Ok(CommandOutcome::Reply(format!("\"Result\" : {summary}")))
    }
}

/// `get_hyperlinks`: every link on the page.
pub struct HyperlinksHandler;

#[async_trait]
impl CommandHandler for HyperlinksHandler {
    type Args = UrlArgs;

    async fn handle(&self, ctx: &CommandContext, args: UrlArgs) -> CommandResult {
        let links = ctx.scraper.scrape_links(&args.url).await?;
        Ok(CommandOutcome::Reply(pretty_json(&links)?))
    }
}
