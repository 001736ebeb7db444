//! Run driver: one query in, one answer out.
//!
//! Reads a single line from the operator, runs the agent, and prints
//! either the parsed questionnaire or, when the model's answer doesn't
//! match the schema, the raw text plus the parse error. The latter is
//! deliberate transparency: show what the model actually said and why it
//! couldn't be parsed.

use std::io::{BufRead, Write};

use crate::agent::ResearchAgent;
use crate::report::parse_research_response;

/// Run one end-to-end research episode.
///
/// Agent failures (model runtime unreachable, iteration cap) propagate
/// to the caller; a final answer that fails to parse does not.
pub async fn run(
    agent: &dyn ResearchAgent,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> anyhow::Result<()> {
    write!(output, "What business idea or niche should I research? ")?;
    output.flush()?;

    let mut query = String::new();
    input.read_line(&mut query)?;
    let query = query.trim();

    if query.is_empty() {
        anyhow::bail!("no query provided");
    }

    tracing::info!("Researching: {}", query);
    let run = agent.research(query).await?;
    tracing::info!("Run finished after {} tool call(s)", run.trace.len());

    match parse_research_response(&run.output) {
        Ok(report) => {
            writeln!(output)?;
            write!(output, "{}", report)?;
        }
        Err(e) => {
            writeln!(output)?;
            writeln!(output, "Could not parse the agent's response:")?;
            writeln!(output, "{}", run.output)?;
            writeln!(output)?;
            writeln!(output, "Parse error: {}", e)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{AgentError, ResearchRun};
    use async_trait::async_trait;

    struct StubAgent {
        outcome: Result<String, ()>,
    }

    impl StubAgent {
        fn answering(text: &str) -> Self {
            Self { outcome: Ok(text.to_string()) }
        }

        fn unreachable() -> Self {
            Self { outcome: Err(()) }
        }
    }

    #[async_trait]
    impl ResearchAgent for StubAgent {
        async fn research(&self, _query: &str) -> Result<ResearchRun, AgentError> {
            match &self.outcome {
                Ok(text) => Ok(ResearchRun { output: text.clone(), trace: vec![] }),
                Err(()) => Err(AgentError::Llm(anyhow::anyhow!("connection refused"))),
            }
        }
    }

    fn full_json_text() -> String {
        serde_json::json!({
            "niche": "eco-friendly packaging",
            "problem_statement": "plastic waste",
            "money_making_opportunities": "B2B subscriptions",
            "market_research": "growing market",
            "target_audience": "online retailers",
            "competitors": "EcoEnclose",
            "pricing_strategy": "tiered pricing",
            "marketing_strategy": "content marketing",
            "product_development": "pilot line",
            "problem_fix": "compostable mailers",
            "feature_list": "custom branding"
        })
        .to_string()
    }

    #[tokio::test]
    async fn well_formed_answer_prints_the_record() {
        let agent = StubAgent::answering(&full_json_text());
        let mut input = "eco-friendly packaging startup\n".as_bytes();
        let mut output = Vec::new();

        run(&agent, &mut input, &mut output).await.unwrap();

        let printed = String::from_utf8(output).unwrap();
        assert!(printed.contains("## Niche"));
        assert!(printed.contains("eco-friendly packaging"));
        assert!(printed.contains("## Competitors"));
        assert!(printed.contains("EcoEnclose"));
        assert!(printed.contains("## Feature list"));
        assert!(printed.contains("custom branding"));
        assert!(!printed.contains("Parse error"));
    }

    #[tokio::test]
    async fn prose_answer_prints_raw_text_and_error() {
        let prose = "The pet food market is large, growing, and highly competitive.";
        let agent = StubAgent::answering(prose);
        let mut input = "pet food\n".as_bytes();
        let mut output = Vec::new();

        // Parse failure is not fatal.
        run(&agent, &mut input, &mut output).await.unwrap();

        let printed = String::from_utf8(output).unwrap();
        assert!(printed.contains("Could not parse"));
        assert!(printed.contains(prose), "raw text must be shown unchanged");
        assert!(printed.contains("Parse error:"));
        assert!(printed.contains("no JSON object"));
    }

    #[tokio::test]
    async fn agent_failure_propagates_with_no_partial_output() {
        let agent = StubAgent::unreachable();
        let mut input = "anything\n".as_bytes();
        let mut output = Vec::new();

        let err = run(&agent, &mut input, &mut output).await.unwrap_err();
        assert!(err.to_string().contains("model call failed"));

        let printed = String::from_utf8(output).unwrap();
        assert!(!printed.contains("##"), "no partial record on agent failure");
        assert!(!printed.contains("Parse error"));
    }

    #[tokio::test]
    async fn empty_input_is_an_error() {
        let agent = StubAgent::answering(&full_json_text());
        let mut input = "\n".as_bytes();
        let mut output = Vec::new();

        let err = run(&agent, &mut input, &mut output).await.unwrap_err();
        assert!(err.to_string().contains("no query"));
    }
}
