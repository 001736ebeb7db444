//! DuckDuckGo web search (no credential; HTML endpoint).

use async_trait::async_trait;
use serde_json::Value;

use super::{http_client, query_schema, require_query, Tool};

const MAX_RESULTS: usize = 5;

/// Web search via DuckDuckGo's HTML interface.
///
/// Needs no API key but the provider may rate-limit; that surfaces as an
/// HTTP error.
pub struct DuckDuckGoSearch;

impl DuckDuckGoSearch {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Tool for DuckDuckGoSearch {
    fn name(&self) -> &str {
        "duckduckgo_search"
    }

    fn description(&self) -> &str {
        "Search the web with DuckDuckGo for industry news, trends, and general business information. Returns result titles with snippets."
    }

    fn parameters_schema(&self) -> Value {
        query_schema("The web search query")
    }

    async fn execute(&self, args: Value) -> anyhow::Result<String> {
        let query = require_query(&args)?;
        let client = http_client()?;

        let url = format!(
            "https://html.duckduckgo.com/html/?q={}",
            urlencoding::encode(query)
        );
        let response = client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow::anyhow!("DuckDuckGo returned HTTP {}", status));
        }

        let html = response.text().await?;
        let results = extract_results(&html);

        if results.is_empty() {
            Ok(format!("No results found for: {}", query))
        } else {
            Ok(results.join("\n\n"))
        }
    }
}

/// Extract ranked results from the DuckDuckGo HTML page.
fn extract_results(html: &str) -> Vec<String> {
    let mut results = Vec::new();

    for (i, chunk) in html.split("class=\"result__body\"").enumerate().skip(1) {
        if i > MAX_RESULTS {
            break;
        }

        let title = chunk
            .split("class=\"result__a\"")
            .nth(1)
            .and_then(|s| s.split('>').nth(1))
            .and_then(|s| s.split('<').next())
            .unwrap_or("");

        let snippet = chunk
            .split("class=\"result__snippet\"")
            .nth(1)
            .and_then(|s| s.split('>').nth(1))
            .and_then(|s| s.split('<').next())
            .unwrap_or("");

        let url = chunk
            .split("class=\"result__url\"")
            .nth(1)
            .and_then(|s| s.split('>').nth(1))
            .and_then(|s| s.split('<').next())
            .map(|s| s.trim())
            .unwrap_or("");

        if !title.is_empty() {
            results.push(format!(
                "**{}**\n{}\nURL: {}",
                html_decode(title),
                html_decode(snippet),
                url
            ));
        }
    }

    results
}

/// Basic HTML entity decoding.
fn html_decode(s: &str) -> String {
    s.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
}
