//! Tavily web search (credentialed provider).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{http_client, query_schema, require_query, Tool};

const SEARCH_URL: &str = "https://api.tavily.com/search";
const MAX_RESULTS: usize = 5;

/// Web search through the Tavily API.
///
/// Fails closed: without a valid `TAVILY_API_KEY` the tool returns an
/// error at invocation time. Startup is unaffected.
pub struct TavilySearch {
    api_key: Option<String>,
}

impl TavilySearch {
    pub fn new(api_key: Option<String>) -> Self {
        Self { api_key }
    }
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: usize,
    search_depth: &'a str,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    title: String,
    url: String,
    content: String,
    #[serde(default)]
    score: f64,
}

#[async_trait]
impl Tool for TavilySearch {
    fn name(&self) -> &str {
        "tavily_search"
    }

    fn description(&self) -> &str {
        "Search the internet for market research, industry news and trends, business information, and financial data."
    }

    fn parameters_schema(&self) -> Value {
        query_schema("The web search query")
    }

    async fn execute(&self, args: Value) -> anyhow::Result<String> {
        let query = require_query(&args)?;

        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("TAVILY_API_KEY is not set; tavily_search is unavailable"))?;

        let request = SearchRequest {
            api_key,
            query,
            max_results: MAX_RESULTS,
            search_depth: "basic",
        };

        let client = http_client()?;
        let response = client.post(SEARCH_URL).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Tavily API error ({}): {}", status, text));
        }

        let search: SearchResponse = response.json().await?;
        Ok(format_results(query, &search))
    }
}

fn format_results(query: &str, search: &SearchResponse) -> String {
    if search.results.is_empty() {
        return format!("No results found for: {}", query);
    }

    search
        .results
        .iter()
        .map(|r| {
            format!(
                "**{}** (score: {:.2})\n{}\nURL: {}",
                r.title, r.score, r.content, r.url
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
