/// Search providers: DuckDuckGo (no key) and Google Custom Search (keyed).
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use taskpilot_core::{CustomSearch, SearchError, SearchHit, WebSearch};

const USER_AGENT: &str = "TaskPilot/0.1";
const GOOGLE_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";

/// Google caps `num` at 10 per request.
const GOOGLE_MAX_RESULTS: usize = 10;

// ---------------------------------------------------------------------------
// DuckDuckGo  (Instant Answer API, no key required)
// ---------------------------------------------------------------------------

pub struct DuckDuckGoSearch {
    client: Client,
    endpoint: String,
}

impl DuckDuckGoSearch {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            endpoint: "https://api.duckduckgo.com/".to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[derive(Deserialize)]
struct DdgResult {
    #[serde(rename = "RelatedTopics", default)]
    related_topics: Vec<DdgTopic>,
}

#[derive(Deserialize)]
struct DdgTopic {
    #[serde(rename = "FirstURL")]
    first_url: Option<String>,
    #[serde(rename = "Text")]
    text: Option<String>,
    /// Category groups nest further topics.
    #[serde(rename = "Topics", default)]
    topics: Vec<DdgTopic>,
}

fn flatten_topics(topics: Vec<DdgTopic>, out: &mut Vec<SearchHit>) {
    for topic in topics {
        if let (Some(href), Some(text)) = (topic.first_url, topic.text) {
            let title = text.split(" - ").next().unwrap_or(&text).to_string();
            out.push(SearchHit { title, href, body: text });
        }
        flatten_topics(topic.topics, out);
    }
}

/// Parse an Instant Answer payload into at most `limit` hits.
fn parse_ddg_response(body: &str, limit: usize) -> Result<Vec<SearchHit>> {
    let res: DdgResult = serde_json::from_str(body)?;
    let mut hits = Vec::new();
    flatten_topics(res.related_topics, &mut hits);
    hits.truncate(limit);
    Ok(hits)
}

#[async_trait]
impl WebSearch for DuckDuckGoSearch {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>> {
        let url = format!(
            "{}?q={}&format=json&no_redirect=1&no_html=1",
            self.endpoint,
            urlencoding::encode(query)
        );
        debug!(query, "DuckDuckGo search");
        let body = self
            .client
            .get(&url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        parse_ddg_response(&body, max_results)
    }
}

// ---------------------------------------------------------------------------
// Google Custom Search
// ---------------------------------------------------------------------------

pub struct GoogleCustomSearch {
    client: Client,
    endpoint: String,
}

impl GoogleCustomSearch {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            endpoint: GOOGLE_ENDPOINT.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[derive(Deserialize)]
struct GoogleResult {
    #[serde(default)]
    items: Vec<GoogleItem>,
}

#[derive(Deserialize)]
struct GoogleItem {
    link: String,
}

#[derive(Deserialize)]
struct GoogleErrorBody {
    error: GoogleError,
}

#[derive(Deserialize)]
struct GoogleError {
    #[serde(default)]
    code: u16,
    #[serde(default)]
    message: String,
}

/// Turn a Custom Search response into result links or a structured error.
pub fn parse_google_response(status: u16, body: &str) -> std::result::Result<Vec<String>, SearchError> {
    if (200..300).contains(&status) {
        let res: GoogleResult =
            serde_json::from_str(body).map_err(|e| SearchError::Other(e.into()))?;
        return Ok(res.items.into_iter().map(|i| i.link).collect());
    }
    match serde_json::from_str::<GoogleErrorBody>(body) {
        Ok(GoogleErrorBody { error }) => {
            let code = if error.code == 0 { status } else { error.code };
            Err(SearchError::api(code, error.message))
        }
        Err(_) => Err(SearchError::api(status, body.trim())),
    }
}

#[async_trait]
impl CustomSearch for GoogleCustomSearch {
    async fn search(
        &self,
        query: &str,
        api_key: &str,
        engine_id: &str,
        max_results: usize,
    ) -> std::result::Result<Vec<String>, SearchError> {
        let num = max_results.clamp(1, GOOGLE_MAX_RESULTS).to_string();
        debug!(query, "Google custom search");
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("key", api_key), ("cx", engine_id), ("q", query), ("num", num.as_str())])
            .send()
            .await
            .map_err(|e| SearchError::Other(e.into()))?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| SearchError::Other(e.into()))?;
        parse_google_response(status, &body)
    }
}
