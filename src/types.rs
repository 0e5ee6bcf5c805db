use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::HelperError;

/// Which template and form are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IssueKind {
    #[default]
    Bug,
    Feature,
}

impl IssueKind {
    /// The `labels` query parameter added to the composed URL, if any
    pub fn label(&self) -> Option<&'static str> {
        match self {
            IssueKind::Bug => None,
            IssueKind::Feature => Some("type:feature"),
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueKind::Bug => write!(f, "bug"),
            IssueKind::Feature => write!(f, "feature"),
        }
    }
}

impl FromStr for IssueKind {
    type Err = HelperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bug" => Ok(IssueKind::Bug),
            "feature" => Ok(IssueKind::Feature),
            _ => Err(HelperError::Other(format!(
                "invalid issue kind '{s}', expected 'bug' or 'feature'"
            ))),
        }
    }
}

pub const VALID_KINDS: &[&str] = &["bug", "feature"];

/// A release tag as reported by the remote, e.g. `v2.0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReleaseVersion(pub String);

impl ReleaseVersion {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Release entry as returned by the releases endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    pub tag_name: String,
}

impl From<Release> for ReleaseVersion {
    fn from(release: Release) -> Self {
        ReleaseVersion(release.tag_name)
    }
}

/// An existing issue matching the user's search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub url: String,
    pub title: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_kind_from_str() {
        assert_eq!("bug".parse::<IssueKind>().unwrap(), IssueKind::Bug);
        assert_eq!("Feature".parse::<IssueKind>().unwrap(), IssueKind::Feature);
        assert!("task".parse::<IssueKind>().is_err());
    }

    #[test]
    fn test_issue_kind_label() {
        assert_eq!(IssueKind::Bug.label(), None);
        assert_eq!(IssueKind::Feature.label(), Some("type:feature"));
    }

    #[test]
    fn test_release_deserializes_from_github_shape() {
        let releases: Vec<Release> =
            serde_json::from_str(r#"[{"tag_name":"v2.0","name":"x"},{"tag_name":"v1.0"}]"#)
                .unwrap();
        let versions: Vec<ReleaseVersion> = releases.into_iter().map(Into::into).collect();
        assert_eq!(versions[0].as_str(), "v2.0");
        assert_eq!(versions[1].to_string(), "v1.0");
    }
}
