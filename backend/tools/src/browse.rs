//! Page scraping: fetch a URL and pull out readable text or hyperlinks.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use tracing::debug;
use url::Url;

use taskpilot_core::PageScraper;

static NON_CONTENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<script\b.*?</script\s*>|<style\b.*?</style\s*>|<noscript\b.*?</noscript\s*>|<!--.*?-->")
        .expect("valid regex")
});
static BLOCK_BREAK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<br\s*/?>|</(p|div|li|h[1-6]|tr|section|article|header|footer)\s*>")
        .expect("valid regex")
});
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]+>").expect("valid regex"));
static ANCHOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<a\b[^>]*?\bhref\s*=\s*["']([^"']*)["'][^>]*>(.*?)</a\s*>"#)
        .expect("valid regex")
});

/// Fetches pages over HTTP with a browser-like user agent.
pub struct HttpScraper {
    client: Client,
    user_agent: String,
}

impl HttpScraper {
    pub fn new(client: Client, user_agent: impl Into<String>) -> Self {
        Self {
            client,
            user_agent: user_agent.into(),
        }
    }

    async fn fetch(&self, url: &str) -> Result<(Url, String)> {
        let parsed = Url::parse(url).with_context(|| format!("Invalid URL: {url}"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            bail!("Unsupported URL scheme '{}'", parsed.scheme());
        }
        debug!(url, "Fetching page");
        let response = self
            .client
            .get(parsed.clone())
            .header("User-Agent", &self.user_agent)
            .send()
            .await?;
        let status = response.status();
        if status.as_u16() >= 400 {
            bail!("HTTP {} error", status.as_u16());
        }
        // Redirects change the base for relative links.
        let final_url = response.url().clone();
        Ok((final_url, response.text().await?))
    }
}

#[async_trait]
impl PageScraper for HttpScraper {
    async fn scrape_text(&self, url: &str) -> Result<String> {
        let (_, html) = self.fetch(url).await?;
        Ok(extract_text(&html))
    }

    async fn scrape_links(&self, url: &str) -> Result<Vec<String>> {
        let (base, html) = self.fetch(url).await?;
        Ok(format_links(&extract_links(&html, &base)))
    }
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Readable text of an HTML document, one phrase per line.
pub fn extract_text(html: &str) -> String {
    let without_scripts = NON_CONTENT_RE.replace_all(html, " ");
    let with_breaks = BLOCK_BREAK_RE.replace_all(&without_scripts, "\n");
    let stripped = TAG_RE.replace_all(&with_breaks, " ");
    let decoded = decode_entities(&stripped);

    decoded
        .lines()
        .flat_map(|line| line.split("  "))
        .map(|phrase| phrase.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|phrase| !phrase.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// `(text, absolute url)` for every anchor with an href, in document order.
pub fn extract_links(html: &str, base: &Url) -> Vec<(String, String)> {
    ANCHOR_RE
        .captures_iter(html)
        .filter_map(|caps| {
            let href = caps[1].trim();
            if href.is_empty()
                || href.starts_with('#')
                || href.starts_with("javascript:")
                || href.starts_with("mailto:")
            {
                return None;
            }
            let absolute = base.join(&decode_entities(href)).ok()?;
            let text = TAG_RE.replace_all(&caps[2], " ");
            let text = decode_entities(&text)
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ");
            Some((text, absolute.to_string()))
        })
        .collect()
}

pub fn format_links(links: &[(String, String)]) -> Vec<String> {
    links
        .iter()
        .map(|(text, url)| format!("{text} ({url})"))
        .collect()
}
