use clap::Parser;
use owo_colors::OwoColorize;
use std::process::ExitCode;

use issue_helper::cli::{Cli, Commands, ConfigAction};
use issue_helper::commands::{
    ComposeOptions, NewOptions, cmd_compose, cmd_config_get, cmd_config_set, cmd_config_show,
    cmd_new, cmd_releases, cmd_search,
};
use issue_helper::logging;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::New {
            kind,
            repo,
            no_open,
        } => {
            cmd_new(NewOptions {
                kind,
                repository: repo,
                open_browser: !no_open,
            })
            .await
        }

        Commands::Compose {
            kind,
            repo,
            title,
            issue_version,
            browser,
            reproduction,
            steps,
            expected,
            actual,
            extra,
            motivation,
            proposal,
            yes,
            no_open,
            json,
        } => {
            cmd_compose(
                ComposeOptions {
                    kind,
                    repository: repo,
                    title,
                    version: issue_version,
                    browser,
                    reproduction,
                    steps,
                    expected,
                    actual,
                    extra,
                    motivation,
                    proposal,
                    yes,
                    open_browser: !no_open,
                },
                json,
            )
            .await
        }

        Commands::Search { keywords, json } => cmd_search(&keywords, json).await,

        Commands::Releases { json } => cmd_releases(json).await,

        Commands::Config { action } => match action {
            ConfigAction::Show { json } => cmd_config_show(json),
            ConfigAction::Get { key, json } => cmd_config_get(&key, json),
            ConfigAction::Set { key, value, json } => cmd_config_set(&key, &value, json),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
