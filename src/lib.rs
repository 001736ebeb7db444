//! # market-scout
//!
//! A market research agent that fills out a fixed business-plan
//! questionnaire from a single free-text idea.
//!
//! This library provides:
//! - Five research tools wrapping public information sources
//!   (Wikipedia, arXiv, PubMed, Tavily, DuckDuckGo)
//! - A tool-based agent loop driven by a local Ollama model
//! - A run driver that parses the final answer into the questionnaire
//!
//! ## Architecture
//!
//! The agent follows the "tools in a loop" pattern:
//! 1. Read one business idea from stdin
//! 2. Build context with the analyst system prompt and available tools
//! 3. Call the model; execute any tool calls and feed results back
//! 4. Repeat until the model emits a final answer
//! 5. Parse the answer into the eleven-field questionnaire and print it
//!
//! ## Example
//!
//! ```rust,ignore
//! use market_scout::{agent::Agent, config::Config};
//!
//! let config = Config::from_env()?;
//! let agent = Agent::new(config);
//! let run = agent.research("eco-friendly packaging startup").await?;
//! ```

pub mod agent;
pub mod config;
pub mod driver;
pub mod llm;
pub mod report;
pub mod tools;

pub use config::Config;
