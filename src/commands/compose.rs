//! Non-interactive issue composition.

use owo_colors::OwoColorize;
use serde_json::json;

use super::{CommandOutput, format_field_errors, interactive, navigator, unknown_repository};
use crate::config::Config;
use crate::coordinator::{CoordinatorSettings, IssueFormCoordinator};
use crate::error::{HelperError, Result};
use crate::form::Field;
use crate::remote::GitHubApi;
use crate::types::IssueKind;

/// Field values and flags for `compose`
#[derive(Debug, Default)]
pub struct ComposeOptions {
    pub kind: IssueKind,
    pub repository: Option<String>,
    pub title: Option<String>,
    pub version: Option<String>,
    pub browser: Option<String>,
    pub reproduction: Option<String>,
    pub steps: Option<String>,
    pub expected: Option<String>,
    pub actual: Option<String>,
    pub extra: Option<String>,
    pub motivation: Option<String>,
    pub proposal: Option<String>,
    /// Skip the confirmation prompt
    pub yes: bool,
    pub open_browser: bool,
}

impl ComposeOptions {
    /// Provided values paired with their fields.
    fn provided(&self) -> Vec<(Field, &str)> {
        [
            (Field::Repository, &self.repository),
            (Field::IssueTitle, &self.title),
            (Field::Version, &self.version),
            (Field::Browser, &self.browser),
            (Field::Reproduction, &self.reproduction),
            (Field::Steps, &self.steps),
            (Field::Expected, &self.expected),
            (Field::Actual, &self.actual),
            (Field::Extra, &self.extra),
            (Field::Motivation, &self.motivation),
            (Field::Proposal, &self.proposal),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.as_deref().map(|v| (field, v)))
        .collect()
    }
}

/// Fill a form from flags, preview it and compose the new issue URL
pub async fn cmd_compose(options: ComposeOptions, output_json: bool) -> Result<()> {
    let config = Config::load()?;
    let api = GitHubApi::from_config(&config)?;
    let coordinator = IssueFormCoordinator::new(
        api,
        navigator(options.open_browser),
        CoordinatorSettings::from_config(&config),
    );
    coordinator.set_issue_kind(options.kind);

    for (field, value) in options.provided() {
        let outcome = coordinator.set_field(field, value)?;
        // Other outcomes are collected by the preview below
        if field == Field::Repository && outcome.is_err() {
            return Err(unknown_repository(value, &config));
        }
    }

    if options.kind == IssueKind::Bug && options.version.is_none() {
        coordinator.load_releases().await;
    }

    let Some(preview) = coordinator.submit_preview() else {
        let errors = coordinator.field_errors();
        eprintln!("{}", format_field_errors(&errors));
        return Err(HelperError::InvalidForm {
            kind: options.kind,
            errors,
        });
    };

    if !options.yes {
        println!("{}\n", preview.dialog_title.cyan().bold());
        println!("{}", preview.markdown);
        if !interactive::confirm(&preview.confirm_label)? {
            println!("Aborted");
            return Ok(());
        }
    }

    let url = coordinator.submit()?;
    coordinator.teardown();

    CommandOutput::new(json!({
        "kind": preview.kind,
        "repository": preview.repository,
        "title": preview.title,
        "url": url,
    }))
    .with_text(url.clone())
    .print(output_json)
}
