//! Chat-completion client abstraction and wire types.
//!
//! The agent only needs one capability from a model runtime: send a list
//! of role-tagged messages plus tool schemas, get back either tool calls
//! or a final assistant message. [`LlmClient`] captures that, and
//! [`OllamaClient`] implements it against a local Ollama server.

mod ollama;

pub use ollama::OllamaClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Message roles in a chat conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// A single chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,

    /// Tool calls the assistant requested, echoed back when replaying
    /// the conversation. Absent on system/user/tool messages.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tool_calls: Option<Vec<ToolCall>>,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into(), tool_calls: None }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into(), tool_calls: None }
    }

    pub fn assistant(content: impl Into<String>, tool_calls: Option<Vec<ToolCall>>) -> Self {
        Self { role: Role::Assistant, content: content.into(), tool_calls }
    }

    pub fn tool(content: impl Into<String>) -> Self {
        Self { role: Role::Tool, content: content.into(), tool_calls: None }
    }
}

/// A tool invocation requested by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    pub function: FunctionCall,
}

/// The function half of a tool call. Ollama sends `arguments` as a JSON
/// object, not a string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: Value,
}

/// What the model answered with: final content, tool calls, or both.
#[derive(Debug, Clone)]
pub struct AssistantMessage {
    pub content: String,
    pub tool_calls: Vec<ToolCall>,
}

/// A chat-completion backend.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Run one completion over the full message history.
    ///
    /// `tools` is a list of chat-API function schemas the model may call.
    async fn chat_completion(
        &self,
        model: &str,
        messages: &[ChatMessage],
        tools: &[Value],
    ) -> anyhow::Result<AssistantMessage>;
}
