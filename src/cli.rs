use clap::{Parser, Subcommand};

use crate::types::IssueKind;

#[derive(Parser)]
#[command(name = "issue-helper")]
#[command(about = "Compose well-formed bug reports and feature requests for GitHub")]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fill in an issue interactively, with similar-issue suggestions
    #[command(visible_alias = "n")]
    New {
        /// Issue type: bug or feature (prompted when omitted)
        #[arg(value_parser = parse_kind)]
        kind: Option<IssueKind>,

        /// Repository to file against (prompted when omitted)
        #[arg(long)]
        repo: Option<String>,

        /// Print the URL instead of opening a browser
        #[arg(long)]
        no_open: bool,
    },

    /// Compose an issue from flags
    Compose {
        /// Issue type: bug or feature
        #[arg(value_parser = parse_kind)]
        kind: IssueKind,

        /// Repository to file against (default from config)
        #[arg(long)]
        repo: Option<String>,

        /// Issue title
        #[arg(short, long)]
        title: Option<String>,

        /// Version the bug was found in (default: newest release)
        #[arg(long)]
        issue_version: Option<String>,

        /// Browser and its version
        #[arg(long)]
        browser: Option<String>,

        /// Link to a minimal reproduction
        #[arg(long)]
        reproduction: Option<String>,

        /// Steps to reproduce
        #[arg(long)]
        steps: Option<String>,

        /// What is expected
        #[arg(long)]
        expected: Option<String>,

        /// What is actually happening
        #[arg(long)]
        actual: Option<String>,

        /// Anything else worth mentioning
        #[arg(long)]
        extra: Option<String>,

        /// What problem the feature solves
        #[arg(long)]
        motivation: Option<String>,

        /// What the proposed API looks like
        #[arg(long)]
        proposal: Option<String>,

        /// Skip the preview confirmation
        #[arg(short, long)]
        yes: bool,

        /// Print the URL instead of opening a browser
        #[arg(long)]
        no_open: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search existing issues
    #[command(visible_alias = "s")]
    Search {
        /// Keywords to search for
        #[arg(required = true)]
        keywords: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List release versions
    Releases {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Get a configuration value
    Get {
        /// Key, e.g. owner, search.limit, github.token, labels.issue.create
        key: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set a configuration value
    Set {
        /// Key, e.g. owner, search.limit, github.token, labels.issue.create
        key: String,

        /// Value to set
        value: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn parse_kind(s: &str) -> Result<IssueKind, String> {
    s.parse().map_err(|e: crate::error::HelperError| e.to_string())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_compose_parses_kind_and_fields() {
        let cli = Cli::try_parse_from([
            "issue-helper",
            "compose",
            "feature",
            "--title",
            "Dark mode",
            "--yes",
            "--no-open",
        ])
        .unwrap();

        match cli.command {
            Commands::Compose {
                kind,
                title,
                yes,
                no_open,
                ..
            } => {
                assert_eq!(kind, IssueKind::Feature);
                assert_eq!(title.as_deref(), Some("Dark mode"));
                assert!(yes);
                assert!(no_open);
            }
            _ => panic!("expected compose"),
        }
    }

    #[test]
    fn test_invalid_kind_is_rejected() {
        assert!(Cli::try_parse_from(["issue-helper", "compose", "task"]).is_err());
    }

    #[test]
    fn test_verbose_counts() {
        let cli = Cli::try_parse_from(["issue-helper", "-vv", "releases"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }
}
