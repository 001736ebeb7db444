//! Ollama chat-completion client (local runtime, `/api/chat`).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{AssistantMessage, ChatMessage, LlmClient, ToolCall};

/// Client for a locally reachable Ollama server.
///
/// The model name is not validated at construction; an unknown model
/// surfaces as an API error on the first call.
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
}

impl OllamaClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<&'a [Value]>,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: String,
    #[serde(default)]
    tool_calls: Vec<ToolCall>,
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn chat_completion(
        &self,
        model: &str,
        messages: &[ChatMessage],
        tools: &[Value],
    ) -> anyhow::Result<AssistantMessage> {
        let request = ChatRequest {
            model,
            messages,
            stream: false,
            tools: if tools.is_empty() { None } else { Some(tools) },
        };

        let url = format!("{}/api/chat", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                anyhow::anyhow!(
                    "failed to reach Ollama at {}: {}. Make sure Ollama is running.",
                    self.base_url,
                    e
                )
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(anyhow::anyhow!("Ollama API error ({}): {}", status, text));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| anyhow::anyhow!("failed to parse Ollama response: {}", e))?;

        Ok(AssistantMessage {
            content: chat.message.content,
            tool_calls: chat.message.tool_calls,
        })
    }
}
