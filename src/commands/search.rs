use owo_colors::OwoColorize;
use serde_json::json;

use super::CommandOutput;
use crate::config::Config;
use crate::error::{HelperError, Result};
use crate::remote::{GitHubApi, IssueApi};

/// Search existing issues once, without debouncing
pub async fn cmd_search(keywords: &[String], output_json: bool) -> Result<()> {
    let keyword = keywords.join(" ");
    if keyword.trim().is_empty() {
        return Err(HelperError::Other("search keyword cannot be empty".to_string()));
    }

    let config = Config::load()?;
    let api = GitHubApi::from_config(&config)?;
    let results = api.search_issues(&keyword).await?;

    let text = if results.is_empty() {
        "No similar issues found".dimmed().to_string()
    } else {
        results
            .iter()
            .map(|r| format!("{}\n  {}", r.title, r.url.dimmed()))
            .collect::<Vec<_>>()
            .join("\n")
    };

    CommandOutput::new(json!({
        "query": api.search_query(&keyword),
        "results": results,
    }))
    .with_text(text)
    .print(output_json)
}
