//! Interactive issue creation.
//!
//! Walks the user through the active form field by field, shows similar
//! issues once a title is entered and offers release tags for the version.

use std::time::Duration;

use owo_colors::OwoColorize;
use tokio::sync::watch;

use super::{format_field_errors, interactive, navigator, unknown_repository};
use crate::config::Config;
use crate::coordinator::{CoordinatorSettings, IssueFormCoordinator, ViewState};
use crate::error::{HelperError, Result};
use crate::form::{Field, FieldRule};
use crate::remote::{GitHubApi, IssueApi};
use crate::types::{IssueKind, VALID_KINDS};

#[derive(Debug, Default)]
pub struct NewOptions {
    pub kind: Option<IssueKind>,
    pub repository: Option<String>,
    pub open_browser: bool,
}

/// Prompt text for a field
fn field_prompt(field: Field) -> &'static str {
    match field {
        Field::Repository => "Repository",
        Field::IssueTitle => "Title",
        Field::Version => "Version",
        Field::Browser => "Browser and its version",
        Field::Reproduction => "Reproduction link",
        Field::Steps => "Steps to reproduce",
        Field::Expected => "What is expected?",
        Field::Actual => "What is actually happening?",
        Field::Extra => "Other (optional)",
        Field::Motivation => "What problem does this feature solve?",
        Field::Proposal => "What does the proposed API look like?",
    }
}

fn is_multiline(field: Field) -> bool {
    matches!(
        field,
        Field::Steps
            | Field::Expected
            | Field::Actual
            | Field::Extra
            | Field::Motivation
            | Field::Proposal
    )
}

pub async fn cmd_new(options: NewOptions) -> Result<()> {
    let config = Config::load()?;
    let api = GitHubApi::from_config(&config)?;
    let coordinator = IssueFormCoordinator::new(
        api,
        navigator(options.open_browser),
        CoordinatorSettings::from_config(&config),
    );
    let mut view = coordinator.subscribe();
    coordinator.initialize();

    let kind = match options.kind {
        Some(kind) => kind,
        None => {
            let idx = interactive::select_option("Issue type", VALID_KINDS, Some(0))?;
            VALID_KINDS[idx].parse()?
        }
    };
    coordinator.set_issue_kind(kind);

    let wait = config.remote_timeout() + config.debounce_window();
    let result = fill_form(&coordinator, &config, &options, &mut view, wait).await;
    let outcome = match result {
        Ok(()) => preview_and_submit(&coordinator),
        Err(e) => Err(e),
    };
    coordinator.teardown();
    outcome
}

async fn fill_form<A: IssueApi>(
    coordinator: &IssueFormCoordinator<A>,
    config: &Config,
    options: &NewOptions,
    view: &mut watch::Receiver<ViewState>,
    wait: Duration,
) -> Result<()> {
    for &field in coordinator.active_fields() {
        match field {
            Field::Repository => {
                let repository = match &options.repository {
                    Some(repo) => repo.clone(),
                    None => select_repository(config)?,
                };
                if coordinator.set_field(field, repository.as_str())?.is_err() {
                    return Err(unknown_repository(&repository, config));
                }
            }
            Field::Version => {
                let state = wait_for(view, wait, |v| v.releases_loaded).await;
                let default = coordinator.field_value(Field::Version).unwrap_or_default();
                let versions: Vec<&str> = state.versions.iter().map(|v| v.as_str()).collect();
                if versions.is_empty() {
                    prompt_field(coordinator, field, Some(&default))?;
                } else {
                    let idx = interactive::select_option(field_prompt(field), &versions, Some(0))?;
                    set_checked(coordinator, field, versions[idx])?;
                }
            }
            Field::IssueTitle => {
                let title = prompt_field(coordinator, field, None)?;
                coordinator.on_search_input(&title);
                let state = wait_for(view, wait, |v| v.search.is_settled()).await;
                print_similar(&state);
            }
            _ => {
                prompt_field(coordinator, field, None)?;
            }
        }
    }
    Ok(())
}

/// Prompt until the field validates. Returns the accepted value.
fn prompt_field<A: IssueApi>(
    coordinator: &IssueFormCoordinator<A>,
    field: Field,
    default: Option<&str>,
) -> Result<String> {
    loop {
        let value = if is_multiline(field) {
            interactive::prompt_multiline(field_prompt(field))?
        } else {
            interactive::prompt_text(field_prompt(field), default)?
        };

        match coordinator.set_field(field, value.clone())? {
            Ok(()) => return Ok(value),
            Err(error) => {
                println!("{} {}", "!".red(), error.red());
                if field.rule() == FieldRule::ReproductionLink {
                    println!(
                        "  {}",
                        "Use a GitHub repository, gist, StackBlitz, CodeSandbox or Gitee link"
                            .dimmed()
                    );
                }
            }
        }
    }
}

fn set_checked<A: IssueApi>(
    coordinator: &IssueFormCoordinator<A>,
    field: Field,
    value: &str,
) -> Result<()> {
    coordinator.set_field(field, value)?.map_err(|error| HelperError::InvalidForm {
        kind: coordinator.kind(),
        errors: vec![(field, error)],
    })
}

fn select_repository(config: &Config) -> Result<String> {
    let options: Vec<&str> = config.repositories.iter().map(String::as_str).collect();
    let default = options
        .iter()
        .position(|r| *r == config.default_repository);
    let idx = interactive::select_option("Repository", &options, default)?;
    Ok(options[idx].to_string())
}

/// Wait for a view matching `ready`, giving up after `wait`.
async fn wait_for(
    view: &mut watch::Receiver<ViewState>,
    wait: Duration,
    ready: impl FnMut(&ViewState) -> bool,
) -> ViewState {
    let settled = match tokio::time::timeout(wait, view.wait_for(ready)).await {
        Ok(Ok(state)) => Some(state.clone()),
        _ => None,
    };

    settled.unwrap_or_else(|| {
        tracing::debug!("gave up waiting for remote data");
        view.borrow().clone()
    })
}

fn print_similar(state: &ViewState) {
    if state.search_results.is_empty() {
        return;
    }
    println!("\n{}", "Similar issues:".yellow().bold());
    for result in &state.search_results {
        println!("  {}", result.title);
        println!("    {}", result.url.dimmed());
    }
    println!();
}

fn preview_and_submit<A: IssueApi>(coordinator: &IssueFormCoordinator<A>) -> Result<()> {
    let Some(preview) = coordinator.submit_preview() else {
        let errors = coordinator.field_errors();
        eprintln!("{}", format_field_errors(&errors));
        return Err(HelperError::InvalidForm {
            kind: coordinator.kind(),
            errors,
        });
    };

    println!("\n{}\n", preview.dialog_title.cyan().bold());
    println!("{}", preview.markdown);

    if !interactive::confirm(&preview.confirm_label)? {
        println!("Aborted");
        return Ok(());
    }

    let url = coordinator.submit()?;
    println!("{url}");
    Ok(())
}
