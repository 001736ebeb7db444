//! System prompt template for the research agent.

use crate::report::ResearchResponse;
use crate::tools::ToolRegistry;

/// Build the system prompt with tool definitions and format instructions.
pub fn build_system_prompt(tools: &ToolRegistry) -> String {
    let tool_descriptions = tools
        .list_tools()
        .iter()
        .map(|t| format!("- **{}**: {}", t.name, t.description))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are a market research analyst. Given a business idea or niche, research it thoroughly and fill out a complete business-plan questionnaire.

## Your Capabilities

You have access to the following research tools:
{tool_descriptions}

## Rules and Guidelines

1. **Research before answering** - Use the tools to ground your answers in current information. Don't rely on trained knowledge alone for market figures, competitors, or trends.

2. **Cover every question** - Every field of the questionnaire must be filled with a substantive answer. If research comes up empty for a field, say so and give your best assessment.

3. **Pick the right source** - Use encyclopedia lookups for background, academic search for technology and health topics, and web search for market data, competitors, and news.

4. **Stay on topic** - Research the user's idea, not adjacent ideas.

## Response Format

{format_instructions}"#,
        tool_descriptions = tool_descriptions,
        format_instructions = format_instructions()
    )
}

/// Textual formatting instructions derived from the questionnaire schema.
fn format_instructions() -> String {
    let fields = ResearchResponse::FIELD_NAMES
        .iter()
        .map(|name| format!(r#"  "{}": "<your answer as text>""#, name))
        .collect::<Vec<_>>()
        .join(",\n");

    format!(
        "When you have finished your research, respond with a single JSON object and nothing else, in exactly this shape:\n\n{{\n{}\n}}\n\nEvery key is required. Do not add keys, nest objects, or wrap the JSON in commentary.",
        fields
    )
}
