//! Research tools the agent can invoke.
//!
//! Each tool is a thin adapter around one external information source:
//! it takes a free-text query, makes one outbound HTTP call, and returns
//! free text. No retries, no caching, no re-ranking beyond what the
//! source itself provides.

mod arxiv;
mod duckduckgo;
mod pubmed;
mod tavily;
mod wikipedia;

pub use arxiv::ArxivSearch;
pub use duckduckgo::DuckDuckGoSearch;
pub use pubmed::PubMedSearch;
pub use tavily::TavilySearch;
pub use wikipedia::WikipediaLookup;

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::config::Config;

/// A named research capability the agent may invoke.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name as exposed to the model.
    fn name(&self) -> &str;

    /// Natural-language description the model uses to pick tools.
    fn description(&self) -> &str;

    /// JSON Schema for the tool's arguments.
    fn parameters_schema(&self) -> Value;

    /// Execute the tool with the given arguments.
    async fn execute(&self, args: Value) -> anyhow::Result<String>;
}

/// Name and description of a registered tool, for prompt rendering.
pub struct ToolInfo {
    pub name: String,
    pub description: String,
}

/// The fixed set of research tools, built once at startup and read-only
/// for the process lifetime.
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    /// Register the five research tools.
    pub fn new(config: &Config) -> Self {
        Self {
            tools: vec![
                Box::new(WikipediaLookup::new()),
                Box::new(ArxivSearch::new()),
                Box::new(PubMedSearch::new()),
                Box::new(TavilySearch::new(config.tavily_api_key.clone())),
                Box::new(DuckDuckGoSearch::new()),
            ],
        }
    }

    #[cfg(test)]
    pub(crate) fn with_tools(tools: Vec<Box<dyn Tool>>) -> Self {
        Self { tools }
    }

    /// Names and descriptions of all registered tools.
    pub fn list_tools(&self) -> Vec<ToolInfo> {
        self.tools
            .iter()
            .map(|t| ToolInfo {
                name: t.name().to_string(),
                description: t.description().to_string(),
            })
            .collect()
    }

    /// Tool schemas in the chat-API function format.
    pub fn get_tool_schemas(&self) -> Vec<Value> {
        self.tools
            .iter()
            .map(|t| {
                json!({
                    "type": "function",
                    "function": {
                        "name": t.name(),
                        "description": t.description(),
                        "parameters": t.parameters_schema(),
                    }
                })
            })
            .collect()
    }

    /// Execute a tool by name.
    pub async fn execute(&self, name: &str, args: Value) -> anyhow::Result<String> {
        let tool = self
            .tools
            .iter()
            .find(|t| t.name() == name)
            .ok_or_else(|| anyhow::anyhow!("Unknown tool: {}", name))?;

        tool.execute(args).await
    }
}

/// Pull the required `query` string out of a tool's arguments.
fn require_query(args: &Value) -> anyhow::Result<&str> {
    args["query"]
        .as_str()
        .ok_or_else(|| anyhow::anyhow!("Missing 'query' argument"))
}

/// The argument schema shared by all five tools: one query string.
fn query_schema(description: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "query": {
                "type": "string",
                "description": description
            }
        },
        "required": ["query"]
    })
}

/// HTTP client with the settings every adapter uses.
fn http_client() -> anyhow::Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .user_agent("Mozilla/5.0 (compatible; MarketScout/1.0)")
        .timeout(Duration::from_secs(30))
        .build()?)
}
