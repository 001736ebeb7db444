//! Core agent loop implementation.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use thiserror::Error;

use crate::config::Config;
use crate::llm::{ChatMessage, LlmClient, OllamaClient};
use crate::tools::ToolRegistry;

use super::prompt::build_system_prompt;

/// How a single research run can fail. A schema mismatch in the final
/// answer is not in here: that is the run driver's problem, this module
/// hands back whatever text the model produced.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("model call failed: {0}")]
    Llm(#[source] anyhow::Error),

    #[error("malformed agent response: reply carried neither content nor tool calls")]
    MalformedResponse,

    #[error("no final answer after {0} iterations")]
    MaxIterations(usize),
}

/// One tool call executed during a run.
#[derive(Debug, Clone)]
pub struct ToolInvocation {
    pub tool: String,
    pub arguments: Value,
    pub result: String,
    pub timestamp: DateTime<Utc>,
}

/// The typed result of a research run: the model's final text plus the
/// trace of tool invocations that led to it.
#[derive(Debug, Clone)]
pub struct ResearchRun {
    pub output: String,
    pub trace: Vec<ToolInvocation>,
}

/// Anything that can answer a research query. The run driver only
/// depends on this, so loop implementations are interchangeable.
#[async_trait]
pub trait ResearchAgent: Send + Sync {
    async fn research(&self, query: &str) -> Result<ResearchRun, AgentError>;
}

/// The research agent: model client + tool registry + loop.
pub struct Agent {
    config: Config,
    llm: Arc<dyn LlmClient>,
    tools: ToolRegistry,
}

impl Agent {
    /// Create a new agent from configuration. Pure wiring: no network
    /// traffic happens until [`Agent::research`] is called.
    pub fn new(config: Config) -> Self {
        let llm = Arc::new(OllamaClient::new(config.ollama_base_url.clone()));
        let tools = ToolRegistry::new(&config);

        Self { config, llm, tools }
    }

    #[cfg(test)]
    pub(crate) fn with_parts(config: Config, llm: Arc<dyn LlmClient>, tools: ToolRegistry) -> Self {
        Self { config, llm, tools }
    }

    /// Run one research episode with prior conversation context.
    ///
    /// `history` slots in between the system prompt and the query; the
    /// run driver passes none.
    pub async fn research_with_history(
        &self,
        query: &str,
        history: &[ChatMessage],
    ) -> Result<ResearchRun, AgentError> {
        let mut trace = Vec::new();

        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::system(build_system_prompt(&self.tools)));
        messages.extend_from_slice(history);
        messages.push(ChatMessage::user(query));

        let tool_schemas = self.tools.get_tool_schemas();

        for iteration in 0..self.config.max_iterations {
            tracing::debug!("Agent iteration {}", iteration + 1);

            let response = self
                .llm
                .chat_completion(&self.config.model, &messages, &tool_schemas)
                .await
                .map_err(AgentError::Llm)?;

            if !response.tool_calls.is_empty() {
                messages.push(ChatMessage::assistant(
                    response.content.clone(),
                    Some(response.tool_calls.clone()),
                ));

                // Execute sequentially; each result goes straight back
                // into the conversation.
                for tool_call in &response.tool_calls {
                    let name = &tool_call.function.name;
                    let args = tool_call.function.arguments.clone();
                    tracing::info!("Calling tool: {} with args: {}", name, args);

                    let result = self.tools.execute(name, args.clone()).await;

                    let result_str = match result {
                        Ok(output) => output,
                        Err(e) => {
                            tracing::warn!("Tool {} failed: {}", name, e);
                            format!("Error: {}", e)
                        }
                    };

                    trace.push(ToolInvocation {
                        tool: name.clone(),
                        arguments: args,
                        result: truncate_for_trace(&result_str, 1000),
                        timestamp: Utc::now(),
                    });

                    messages.push(ChatMessage::tool(result_str));
                }

                continue;
            }

            // No tool calls - this is the final response
            if !response.content.trim().is_empty() {
                return Ok(ResearchRun {
                    output: response.content,
                    trace,
                });
            }

            return Err(AgentError::MalformedResponse);
        }

        Err(AgentError::MaxIterations(self.config.max_iterations))
    }
}

#[async_trait]
impl ResearchAgent for Agent {
    async fn research(&self, query: &str) -> Result<ResearchRun, AgentError> {
        self.research_with_history(query, &[]).await
    }
}

/// Truncate a tool result for the trace.
fn truncate_for_trace(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut end = max_len;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... [truncated]", &s[..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{AssistantMessage, FunctionCall, ToolCall};
    use crate::tools::Tool;
    use serde_json::json;
    use std::sync::Mutex;

    /// LLM stub that replays a fixed list of replies, repeating the last
    /// one when the script runs out.
    struct ScriptedLlm {
        replies: Mutex<Vec<AssistantMessage>>,
        fail: bool,
    }

    impl ScriptedLlm {
        fn new(replies: Vec<AssistantMessage>) -> Self {
            Self { replies: Mutex::new(replies), fail: false }
        }

        fn failing() -> Self {
            Self { replies: Mutex::new(Vec::new()), fail: true }
        }
    }

    #[async_trait]
    impl LlmClient for ScriptedLlm {
        async fn chat_completion(
            &self,
            _model: &str,
            _messages: &[ChatMessage],
            _tools: &[Value],
        ) -> anyhow::Result<AssistantMessage> {
            if self.fail {
                return Err(anyhow::anyhow!("connection refused"));
            }
            let mut replies = self.replies.lock().unwrap();
            if replies.len() > 1 {
                Ok(replies.remove(0))
            } else {
                Ok(replies[0].clone())
            }
        }
    }

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }
        fn description(&self) -> &str {
            "Echo the query back."
        }
        fn parameters_schema(&self) -> Value {
            json!({"type": "object", "properties": {"query": {"type": "string"}}, "required": ["query"]})
        }
        async fn execute(&self, args: Value) -> anyhow::Result<String> {
            Ok(format!("echo: {}", args["query"].as_str().unwrap_or("")))
        }
    }

    struct BrokenTool;

    #[async_trait]
    impl Tool for BrokenTool {
        fn name(&self) -> &str {
            "broken"
        }
        fn description(&self) -> &str {
            "Always fails."
        }
        fn parameters_schema(&self) -> Value {
            json!({"type": "object", "properties": {}})
        }
        async fn execute(&self, _args: Value) -> anyhow::Result<String> {
            Err(anyhow::anyhow!("upstream unavailable"))
        }
    }

    fn tool_call(name: &str, args: Value) -> AssistantMessage {
        AssistantMessage {
            content: String::new(),
            tool_calls: vec![ToolCall {
                function: FunctionCall { name: name.to_string(), arguments: args },
            }],
        }
    }

    fn final_answer(text: &str) -> AssistantMessage {
        AssistantMessage { content: text.to_string(), tool_calls: vec![] }
    }

    fn agent_with(llm: ScriptedLlm, tools: Vec<Box<dyn Tool>>) -> Agent {
        let config = Config::new("http://localhost:11434".to_string(), "test-model".to_string());
        Agent::with_parts(config, Arc::new(llm), ToolRegistry::with_tools(tools))
    }

    #[tokio::test]
    async fn immediate_answer_has_empty_trace() {
        let agent = agent_with(
            ScriptedLlm::new(vec![final_answer("{\"niche\": \"done\"}")]),
            vec![Box::new(EchoTool)],
        );

        let run = agent.research("pet food").await.unwrap();
        assert_eq!(run.output, "{\"niche\": \"done\"}");
        assert!(run.trace.is_empty());
    }

    #[tokio::test]
    async fn tool_call_is_executed_and_traced() {
        let agent = agent_with(
            ScriptedLlm::new(vec![
                tool_call("echo", json!({"query": "eco packaging"})),
                final_answer("final text"),
            ]),
            vec![Box::new(EchoTool)],
        );

        let run = agent.research("eco packaging").await.unwrap();
        assert_eq!(run.output, "final text");
        assert_eq!(run.trace.len(), 1);
        assert_eq!(run.trace[0].tool, "echo");
        assert_eq!(run.trace[0].result, "echo: eco packaging");
        assert_eq!(run.trace[0].arguments["query"], "eco packaging");
    }

    #[tokio::test]
    async fn tool_failure_is_fed_back_not_fatal() {
        let agent = agent_with(
            ScriptedLlm::new(vec![
                tool_call("broken", json!({})),
                final_answer("recovered"),
            ]),
            vec![Box::new(BrokenTool)],
        );

        let run = agent.research("anything").await.unwrap();
        assert_eq!(run.output, "recovered");
        assert!(run.trace[0].result.starts_with("Error:"));
        assert!(run.trace[0].result.contains("upstream unavailable"));
    }

    #[tokio::test]
    async fn unknown_tool_is_fed_back_as_error_text() {
        let agent = agent_with(
            ScriptedLlm::new(vec![
                tool_call("crystal_ball", json!({"query": "x"})),
                final_answer("done"),
            ]),
            vec![Box::new(EchoTool)],
        );

        let run = agent.research("anything").await.unwrap();
        assert!(run.trace[0].result.contains("Unknown tool"));
    }

    #[tokio::test]
    async fn empty_reply_is_malformed_response() {
        let agent = agent_with(
            ScriptedLlm::new(vec![AssistantMessage { content: "  ".to_string(), tool_calls: vec![] }]),
            vec![Box::new(EchoTool)],
        );

        let err = agent.research("anything").await.unwrap_err();
        assert!(matches!(err, AgentError::MalformedResponse));
    }

    #[tokio::test]
    async fn endless_tool_calls_hit_the_iteration_cap() {
        let agent = agent_with(
            ScriptedLlm::new(vec![tool_call("echo", json!({"query": "again"}))]),
            vec![Box::new(EchoTool)],
        );

        let err = agent.research("anything").await.unwrap_err();
        assert!(matches!(err, AgentError::MaxIterations(10)));
    }

    #[tokio::test]
    async fn llm_failure_propagates() {
        let agent = agent_with(ScriptedLlm::failing(), vec![Box::new(EchoTool)]);

        let err = agent.research("anything").await.unwrap_err();
        assert!(matches!(err, AgentError::Llm(_)));
        assert!(err.to_string().contains("model call failed"));
    }

    #[test]
    fn truncation_marks_cut_content() {
        let long = "x".repeat(1200);
        let truncated = truncate_for_trace(&long, 1000);
        assert!(truncated.ends_with("... [truncated]"));
        assert!(truncated.len() < long.len());

        assert_eq!(truncate_for_trace("short", 1000), "short");
    }
}
