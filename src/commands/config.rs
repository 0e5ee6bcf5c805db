//! Configuration commands.
//!
//! - `config show`: Display current configuration
//! - `config get`: Read a single value
//! - `config set`: Write a single value

use owo_colors::OwoColorize;
use serde_json::json;

use super::CommandOutput;
use crate::config::Config;
use crate::error::Result;

/// Show current configuration
pub fn cmd_config_show(output_json: bool) -> Result<()> {
    let config = Config::load()?;
    let path = Config::config_path()?;
    let github_configured = config.github_token().is_some();

    let json_output = json!({
        "owner": config.owner,
        "repositories": config.repositories,
        "default_repository": config.default_repository,
        "release_repository": config.release_repository,
        "search_repository": config.search_repository,
        "api_base_url": config.api_base_url,
        "web_base_url": config.web_base_url,
        "search": {
            "debounce_ms": config.search.debounce_ms,
            "limit": config.search.limit,
        },
        "remote_timeout": config.remote_timeout,
        "labels": config.labels,
        "auth": {
            "github_token_configured": github_configured,
        },
        "config_file": path.to_string_lossy(),
    });

    let mut text = format!("{}\n\n", "Configuration:".cyan().bold());
    for (key, value) in [
        ("owner", config.owner.clone()),
        ("repositories", config.repositories.join(", ")),
        ("default_repository", config.default_repository.clone()),
        ("release_repository", config.release_repository.clone()),
        ("search_repository", config.search_repository.clone()),
        ("api_base_url", config.api_base_url.clone()),
        ("web_base_url", config.web_base_url.clone()),
        ("remote_timeout", format!("{}s", config.remote_timeout)),
    ] {
        text.push_str(&format!("{}: {value}\n", key.cyan()));
    }

    text.push_str(&format!("\n{}:\n", "search".cyan()));
    text.push_str(&format!("  debounce_ms: {}\n", config.search.debounce_ms));
    text.push_str(&format!("  limit: {}\n", config.search.limit));

    if !config.labels.is_empty() {
        text.push_str(&format!("\n{}:\n", "labels".cyan()));
        for (key, value) in &config.labels {
            text.push_str(&format!("  {key}: {value}\n"));
        }
    }

    let github_status = if github_configured {
        "configured".green().to_string()
    } else {
        "not configured".dimmed().to_string()
    };
    text.push_str(&format!("\n{}:\n", "auth".cyan()));
    text.push_str(&format!("  github.token: {github_status}\n\n"));
    text.push_str(&format!(
        "{}",
        format!("Config file: {}", path.display()).dimmed()
    ));

    CommandOutput::new(json_output)
        .with_text(text)
        .print(output_json)
}

/// Get a configuration value
pub fn cmd_config_get(key: &str, output_json: bool) -> Result<()> {
    let config = Config::load()?;
    let value = config.get_value(key)?;

    CommandOutput::new(json!({
        "key": key,
        "value": value,
        "masked": key == "github.token",
    }))
    .with_text(value)
    .print(output_json)
}

/// Set a configuration value
pub fn cmd_config_set(key: &str, value: &str, output_json: bool) -> Result<()> {
    let mut config = Config::load()?;
    config.set_value(key, value)?;
    config.save()?;

    let shown = if key == "github.token" {
        config.get_value(key)?
    } else {
        value.to_string()
    };

    CommandOutput::new(json!({
        "action": "config_set",
        "key": key,
        "value": shown,
        "success": true,
    }))
    .with_text(format!("Set {} = {shown}", key.cyan()))
    .print(output_json)
}
