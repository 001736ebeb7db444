//! PubMed biomedical literature search via NCBI E-utilities.

use async_trait::async_trait;
use serde_json::Value;

use super::{http_client, query_schema, require_query, Tool};

const MAX_RESULTS: usize = 5;

/// Search PubMed for medical and health-related research papers.
pub struct PubMedSearch;

impl PubMedSearch {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Tool for PubMedSearch {
    fn name(&self) -> &str {
        "pubmed_search"
    }

    fn description(&self) -> &str {
        "Search PubMed for medical and health-related research papers. Useful for healthcare, biotech, and pharmaceutical market research."
    }

    fn parameters_schema(&self) -> Value {
        query_schema("The medical or health topic to search for")
    }

    async fn execute(&self, args: Value) -> anyhow::Result<String> {
        let query = require_query(&args)?;
        let client = http_client()?;

        // Step 1: esearch resolves the query to article IDs.
        let search_url = format!(
            "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esearch.fcgi?db=pubmed&term={}&retmax={}&retmode=json",
            urlencoding::encode(query),
            MAX_RESULTS
        );
        let search: Value = client.get(&search_url).send().await?.json().await?;

        let ids = extract_id_list(&search);
        if ids.is_empty() {
            return Ok(format!("No PubMed results for: {}", query));
        }

        // Step 2: esummary fetches article metadata for those IDs.
        let summary_url = format!(
            "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esummary.fcgi?db=pubmed&id={}&retmode=json",
            ids.join(",")
        );
        let summary: Value = client.get(&summary_url).send().await?.json().await?;

        Ok(format_articles(&ids, &summary))
    }
}

/// Pull the ID list out of an esearch response.
fn extract_id_list(search: &Value) -> Vec<String> {
    search["esearchresult"]["idlist"]
        .as_array()
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}

/// Render esummary article records as a formatted listing.
fn format_articles(ids: &[String], summary: &Value) -> String {
    let result = &summary["result"];
    let mut articles = Vec::new();

    for id in ids {
        let article = &result[id.as_str()];
        let title = article["title"].as_str().unwrap_or("");
        if title.is_empty() {
            continue;
        }

        let journal = article["fulljournalname"].as_str().unwrap_or("");
        let pub_date = article["pubdate"].as_str().unwrap_or("");
        let authors: Vec<&str> = article["authors"]
            .as_array()
            .map(|a| a.iter().filter_map(|au| au["name"].as_str()).collect())
            .unwrap_or_default();

        articles.push(format!(
            "**{}**\nAuthors: {}\n{} ({})\nURL: https://pubmed.ncbi.nlm.nih.gov/{}/",
            title,
            authors.join(", "),
            journal,
            pub_date,
            id
        ));
    }

    articles.join("\n\n")
}
