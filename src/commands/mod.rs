mod compose;
mod config;
pub mod interactive;
mod new;
mod releases;
mod search;

pub use compose::{ComposeOptions, cmd_compose};
pub use config::{cmd_config_get, cmd_config_set, cmd_config_show};
pub use new::{NewOptions, cmd_new};
pub use releases::cmd_releases;
pub use search::cmd_search;

use owo_colors::OwoColorize;
use serde_json::Value;

use crate::config::Config;
use crate::error::{HelperError, Result};
use crate::form::{Field, FieldError};
use crate::navigate::{BrowserNavigator, Navigator, PrintNavigator};

/// Command result printed either as JSON or as human readable text.
pub struct CommandOutput {
    json: Value,
    text: Option<String>,
}

impl CommandOutput {
    pub fn new(json: Value) -> Self {
        Self { json, text: None }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Print to stdout. Text falls back to pretty JSON when none was given.
    pub fn print(self, output_json: bool) -> Result<()> {
        match (output_json, self.text) {
            (false, Some(text)) => println!("{text}"),
            _ => println!("{}", serde_json::to_string_pretty(&self.json)?),
        }
        Ok(())
    }
}

/// Format validation errors one per line
pub fn format_field_errors(errors: &[(Field, FieldError)]) -> String {
    errors
        .iter()
        .map(|(field, error)| format!("  {}: {}", field.as_str().cyan(), error.red()))
        .collect::<Vec<_>>()
        .join("\n")
}

pub(crate) fn unknown_repository(repository: &str, config: &Config) -> HelperError {
    HelperError::Config(format!(
        "unknown repository '{repository}', expected one of: {}",
        config.repositories.join(", ")
    ))
}

pub(crate) fn navigator(open_browser: bool) -> Box<dyn Navigator> {
    if open_browser {
        Box::new(BrowserNavigator)
    } else {
        Box::new(PrintNavigator)
    }
}
