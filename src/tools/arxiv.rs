//! arXiv preprint search via the public Atom API.

use async_trait::async_trait;
use serde_json::Value;

use super::{http_client, query_schema, require_query, Tool};

const MAX_RESULTS: usize = 5;

/// Search arXiv for preprints and academic papers.
pub struct ArxivSearch;

impl ArxivSearch {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Tool for ArxivSearch {
    fn name(&self) -> &str {
        "arxiv_search"
    }

    fn description(&self) -> &str {
        "Search arXiv for scientific papers and preprints. Useful for technological trends, innovations, and academic insights on a research topic."
    }

    fn parameters_schema(&self) -> Value {
        query_schema("The research topic to search for")
    }

    async fn execute(&self, args: Value) -> anyhow::Result<String> {
        let query = require_query(&args)?;
        let client = http_client()?;

        let url = format!(
            "https://export.arxiv.org/api/query?search_query=all:{}&start=0&max_results={}",
            urlencoding::encode(query),
            MAX_RESULTS
        );
        let body = client.get(&url).send().await?.text().await?;

        let entries = parse_atom_entries(&body);
        if entries.is_empty() {
            Ok(format!("No arXiv results for: {}", query))
        } else {
            Ok(entries.join("\n\n"))
        }
    }
}

/// Parse the Atom feed into formatted entry texts.
fn parse_atom_entries(xml: &str) -> Vec<String> {
    let mut entries = Vec::new();

    for entry in xml.split("<entry>").skip(1) {
        let title = extract_xml_tag(entry, "title")
            .map(|t| collapse_whitespace(&t))
            .unwrap_or_default();
        let summary = extract_xml_tag(entry, "summary")
            .map(|s| collapse_whitespace(&s))
            .unwrap_or_default();
        let id = extract_xml_tag(entry, "id").unwrap_or_default();
        let published = extract_xml_tag(entry, "published").unwrap_or_default();

        let authors: Vec<String> = entry
            .split("<author>")
            .skip(1)
            .filter_map(|a| extract_xml_tag(a, "name"))
            .collect();

        if title.is_empty() {
            continue;
        }

        entries.push(format!(
            "**{}**\nAuthors: {}\nPublished: {}\n{}\nURL: {}",
            title,
            authors.join(", "),
            published,
            summary,
            id
        ));
    }

    entries
}

/// Extract the text between `<tag ...>` and `</tag>`.
fn extract_xml_tag(xml: &str, tag: &str) -> Option<String> {
    let open = format!("<{}", tag);
    let close = format!("</{}>", tag);

    let start = xml.find(&open)?;
    let content_start = start + xml[start..].find('>')? + 1;
    let content_end = content_start + xml[content_start..].find(&close)?;

    Some(xml[content_start..content_end].trim().to_string())
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
