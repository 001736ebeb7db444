//! Wikipedia lookup: opensearch for the best-matching title, then the
//! REST summary endpoint for its extract.

use async_trait::async_trait;
use serde_json::Value;

use super::{http_client, query_schema, require_query, Tool};

/// Encyclopedia summary lookup.
///
/// An ambiguous or unknown topic yields informative text, not an error,
/// so the agent can rephrase and try again.
pub struct WikipediaLookup;

impl WikipediaLookup {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Tool for WikipediaLookup {
    fn name(&self) -> &str {
        "wikipedia_lookup"
    }

    fn description(&self) -> &str {
        "Look up general knowledge and quick facts. Use this to get a summary of a topic, concept, industry, or company."
    }

    fn parameters_schema(&self) -> Value {
        query_schema("The topic or term to look up")
    }

    async fn execute(&self, args: Value) -> anyhow::Result<String> {
        let query = require_query(&args)?;
        let client = http_client()?;

        // Resolve the query to a page title first; summaries need exact titles.
        let search_url = format!(
            "https://en.wikipedia.org/w/api.php?action=opensearch&search={}&limit=1&format=json",
            urlencoding::encode(query)
        );
        let search: Value = client.get(&search_url).send().await?.json().await?;

        let title = search[1]
            .as_array()
            .and_then(|titles| titles.first())
            .and_then(|t| t.as_str());

        let Some(title) = title else {
            return Ok(format!("No Wikipedia page found for: {}", query));
        };

        let summary_url = format!(
            "https://en.wikipedia.org/api/rest_v1/page/summary/{}",
            urlencoding::encode(title)
        );
        let summary: Value = client.get(&summary_url).send().await?.json().await?;

        Ok(format_summary(title, &summary, query))
    }
}

/// Render the REST summary payload as plain text.
fn format_summary(title: &str, summary: &Value, query: &str) -> String {
    match summary["extract"].as_str().filter(|s| !s.is_empty()) {
        Some(extract) => format!("{}: {}", title, extract),
        None => format!("No Wikipedia summary available for: {}", query),
    }
}
