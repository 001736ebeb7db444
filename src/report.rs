//! The business-plan questionnaire record and the parser that coerces the
//! model's final text into it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The fixed questionnaire the agent is asked to fill out.
///
/// Eleven free-text fields, produced once per run from the model's final
/// answer and printed to stdout. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchResponse {
    pub niche: String,
    pub problem_statement: String,
    pub money_making_opportunities: String,
    pub market_research: String,
    pub target_audience: String,
    pub competitors: String,
    pub pricing_strategy: String,
    pub marketing_strategy: String,
    pub product_development: String,
    pub problem_fix: String,
    pub feature_list: String,
}

impl ResearchResponse {
    /// Field names in output order. The prompt's format instructions are
    /// generated from this list so it cannot drift from the struct.
    pub const FIELD_NAMES: [&'static str; 11] = [
        "niche",
        "problem_statement",
        "money_making_opportunities",
        "market_research",
        "target_audience",
        "competitors",
        "pricing_strategy",
        "marketing_strategy",
        "product_development",
        "problem_fix",
        "feature_list",
    ];

    fn fields(&self) -> [(&'static str, &str); 11] {
        [
            ("Niche", &self.niche),
            ("Problem statement", &self.problem_statement),
            ("Money-making opportunities", &self.money_making_opportunities),
            ("Market research", &self.market_research),
            ("Target audience", &self.target_audience),
            ("Competitors", &self.competitors),
            ("Pricing strategy", &self.pricing_strategy),
            ("Marketing strategy", &self.marketing_strategy),
            ("Product development", &self.product_development),
            ("Problem fix", &self.problem_fix),
            ("Feature list", &self.feature_list),
        ]
    }
}

impl std::fmt::Display for ResearchResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (label, value) in self.fields() {
            writeln!(f, "## {}", label)?;
            writeln!(f, "{}", value)?;
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Why the model's final text could not be parsed into a [`ResearchResponse`].
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("no JSON object found in the response text")]
    NoJsonObject,

    #[error("response JSON does not match the questionnaire schema: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse the agent's final answer into a [`ResearchResponse`].
///
/// Models wrap JSON in prose or Markdown fences more often than not, so
/// this strips code fences and extracts the outermost `{...}` before
/// deserializing. The caller keeps the raw text; on failure it is printed
/// unchanged next to the error.
pub fn parse_research_response(text: &str) -> Result<ResearchResponse, ParseError> {
    let json = extract_json_object(text).ok_or(ParseError::NoJsonObject)?;
    Ok(serde_json::from_str(json)?)
}

/// Find the outermost JSON object in a block of text: the slice from
/// the first `{` to the last `}`.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}
