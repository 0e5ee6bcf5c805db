use owo_colors::OwoColorize;
use serde_json::json;

use super::CommandOutput;
use crate::config::Config;
use crate::error::Result;
use crate::remote::{GitHubApi, IssueApi};
use crate::types::ReleaseVersion;

/// List release tags, newest first
pub async fn cmd_releases(output_json: bool) -> Result<()> {
    let config = Config::load()?;
    let api = GitHubApi::from_config(&config)?;
    let versions: Vec<ReleaseVersion> = api
        .list_releases()
        .await?
        .into_iter()
        .map(ReleaseVersion::from)
        .collect();

    let text = match versions.split_first() {
        None => "No releases found".dimmed().to_string(),
        Some((newest, rest)) => {
            let mut lines = vec![format!("{} {}", newest, "(latest)".green())];
            lines.extend(rest.iter().map(ToString::to_string));
            lines.join("\n")
        }
    };

    CommandOutput::new(json!({
        "repository": format!("{}/{}", config.owner, config.release_repository),
        "versions": versions,
    }))
    .with_text(text)
    .print(output_json)
}
