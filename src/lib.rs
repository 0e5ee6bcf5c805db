pub mod cli;
pub mod commands;
pub mod compose;
pub mod config;
pub mod coordinator;
pub mod debounce;
pub mod error;
pub mod form;
pub mod logging;
pub mod navigate;
pub mod remote;
pub mod template;
pub mod types;

pub use config::Config;
pub use coordinator::{CoordinatorSettings, IssueFormCoordinator, Preview, SearchStatus, ViewState};
pub use error::{HelperError, Result};
pub use form::{BugFormFields, FeatureFormFields, Field, FieldError, ValidationOutcome};
pub use remote::{GitHubApi, IssueApi};
pub use types::{IssueKind, Release, ReleaseVersion, SearchResult};
