//! Configuration management for market-scout.
//!
//! Configuration comes from environment variables (optionally loaded from
//! a `.env` file at startup):
//! - `OLLAMA_BASE_URL` - Optional. Base URL of the local Ollama server. Defaults to `http://localhost:11434`.
//! - `RESEARCH_MODEL` - Optional. Model name the runtime must have available. Defaults to `deepseek-r1:32b`.
//! - `TAVILY_API_KEY` - Optional. Credential for the Tavily web-search tool. Without it that tool fails when invoked, not at startup.
//! - `MAX_ITERATIONS` - Optional. Maximum agent loop iterations. Defaults to `10`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Agent configuration. Built once at startup, read-only thereafter.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the local Ollama server
    pub ollama_base_url: String,

    /// Model identifier; not validated here, an unavailable model fails
    /// on the first completion call
    pub model: String,

    /// Tavily API key, if configured
    pub tavily_api_key: Option<String>,

    /// Maximum iterations for the agent loop
    pub max_iterations: usize,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let ollama_base_url = std::env::var("OLLAMA_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:11434".to_string());

        let model =
            std::env::var("RESEARCH_MODEL").unwrap_or_else(|_| "deepseek-r1:32b".to_string());

        let tavily_api_key = std::env::var("TAVILY_API_KEY").ok();

        let max_iterations = std::env::var("MAX_ITERATIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .map_err(|e| ConfigError::InvalidValue("MAX_ITERATIONS".to_string(), format!("{}", e)))?;

        Ok(Self {
            ollama_base_url,
            model,
            tavily_api_key,
            max_iterations,
        })
    }

    /// Create a config with custom values (useful for testing).
    pub fn new(ollama_base_url: String, model: String) -> Self {
        Self {
            ollama_base_url,
            model,
            tavily_api_key: None,
            max_iterations: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_has_no_credential() {
        let config = Config::new("http://localhost:11434".to_string(), "test-model".to_string());
        assert_eq!(config.model, "test-model");
        assert!(config.tavily_api_key.is_none());
        assert_eq!(config.max_iterations, 10);
    }

    #[test]
    fn invalid_value_error_names_the_variable() {
        let err = ConfigError::InvalidValue("MAX_ITERATIONS".to_string(), "bad".to_string());
        assert!(err.to_string().contains("MAX_ITERATIONS"));
    }
}
