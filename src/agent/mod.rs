//! Agent module - the research agent's reasoning loop.
//!
//! The agent follows a "tools in a loop" pattern:
//! 1. Build context with system prompt and the user's query
//! 2. Call the model with the available research tools
//! 3. If the model requests tool calls, execute them and feed results back
//! 4. Repeat until the model produces a final answer or the iteration cap

mod agent_loop;
mod prompt;

pub use agent_loop::{Agent, AgentError, ResearchAgent, ResearchRun, ToolInvocation};
pub use prompt::build_system_prompt;
