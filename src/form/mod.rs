//! Form schemas and field validation for the two issue kinds.
//!
//! Each kind has its own field set. Every field carries a rule; validation
//! runs per field when a value is written (the "blur" check) and for the
//! whole form when a preview is requested.

pub mod link;

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::HelperError;

pub use link::validate_reproduction_link;

/// Why a field failed validation.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldError {
    #[error("this field is required")]
    Required,
    #[error("invalid format")]
    InvalidFormat,
}

pub type ValidationOutcome = std::result::Result<(), FieldError>;

/// Every form control across both kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Repository,
    IssueTitle,
    Version,
    Browser,
    Reproduction,
    Steps,
    Expected,
    Actual,
    Extra,
    Motivation,
    Proposal,
}

/// Validation rule attached to a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    Required,
    Optional,
    ReproductionLink,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Repository => "repository",
            Field::IssueTitle => "issue_title",
            Field::Version => "version",
            Field::Browser => "browser",
            Field::Reproduction => "reproduction",
            Field::Steps => "steps",
            Field::Expected => "expected",
            Field::Actual => "actual",
            Field::Extra => "extra",
            Field::Motivation => "motivation",
            Field::Proposal => "proposal",
        }
    }

    pub fn rule(&self) -> FieldRule {
        match self {
            Field::Extra => FieldRule::Optional,
            Field::Reproduction => FieldRule::ReproductionLink,
            _ => FieldRule::Required,
        }
    }

    /// Run this field's rule against a value.
    pub fn validate(&self, value: &str) -> ValidationOutcome {
        match self.rule() {
            FieldRule::Optional => Ok(()),
            FieldRule::Required if value.trim().is_empty() => Err(FieldError::Required),
            FieldRule::Required => Ok(()),
            FieldRule::ReproductionLink => validate_reproduction_link(value),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = HelperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        match normalized.as_str() {
            "repository" | "repo" => Ok(Field::Repository),
            "issue_title" | "title" => Ok(Field::IssueTitle),
            "version" => Ok(Field::Version),
            "browser" => Ok(Field::Browser),
            "reproduction" => Ok(Field::Reproduction),
            "steps" => Ok(Field::Steps),
            "expected" => Ok(Field::Expected),
            "actual" | "actually" => Ok(Field::Actual),
            "extra" => Ok(Field::Extra),
            "motivation" => Ok(Field::Motivation),
            "proposal" => Ok(Field::Proposal),
            _ => Err(HelperError::Other(format!("unknown field '{s}'"))),
        }
    }
}

/// A set of named string fields making up one issue kind's form.
pub trait FormFields: Clone + fmt::Debug + Send + 'static {
    /// Fields in display order.
    const FIELDS: &'static [Field];

    fn get(&self, field: Field) -> Option<&str>;

    /// Returns `false` when the field is not part of this schema.
    fn set(&mut self, field: Field, value: String) -> bool;

    fn repository(&self) -> &str;

    fn issue_title(&self) -> &str;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BugFormFields {
    pub repository: String,
    pub issue_title: String,
    pub version: String,
    pub browser: String,
    pub reproduction: String,
    pub steps: String,
    pub expected: String,
    pub actual: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<String>,
}

impl FormFields for BugFormFields {
    const FIELDS: &'static [Field] = &[
        Field::Repository,
        Field::IssueTitle,
        Field::Version,
        Field::Browser,
        Field::Reproduction,
        Field::Steps,
        Field::Expected,
        Field::Actual,
        Field::Extra,
    ];

    fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::Repository => Some(self.repository.as_str()),
            Field::IssueTitle => Some(self.issue_title.as_str()),
            Field::Version => Some(self.version.as_str()),
            Field::Browser => Some(self.browser.as_str()),
            Field::Reproduction => Some(self.reproduction.as_str()),
            Field::Steps => Some(self.steps.as_str()),
            Field::Expected => Some(self.expected.as_str()),
            Field::Actual => Some(self.actual.as_str()),
            Field::Extra => Some(self.extra.as_deref().unwrap_or("")),
            Field::Motivation | Field::Proposal => None,
        }
    }

    fn set(&mut self, field: Field, value: String) -> bool {
        let slot = match field {
            Field::Repository => &mut self.repository,
            Field::IssueTitle => &mut self.issue_title,
            Field::Version => &mut self.version,
            Field::Browser => &mut self.browser,
            Field::Reproduction => &mut self.reproduction,
            Field::Steps => &mut self.steps,
            Field::Expected => &mut self.expected,
            Field::Actual => &mut self.actual,
            Field::Extra => {
                self.extra = if value.trim().is_empty() {
                    None
                } else {
                    Some(value)
                };
                return true;
            }
            Field::Motivation | Field::Proposal => return false,
        };
        *slot = value;
        true
    }

    fn repository(&self) -> &str {
        &self.repository
    }

    fn issue_title(&self) -> &str {
        &self.issue_title
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFormFields {
    pub repository: String,
    pub issue_title: String,
    pub motivation: String,
    pub proposal: String,
}

impl FormFields for FeatureFormFields {
    const FIELDS: &'static [Field] = &[
        Field::Repository,
        Field::IssueTitle,
        Field::Motivation,
        Field::Proposal,
    ];

    fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::Repository => Some(self.repository.as_str()),
            Field::IssueTitle => Some(self.issue_title.as_str()),
            Field::Motivation => Some(self.motivation.as_str()),
            Field::Proposal => Some(self.proposal.as_str()),
            _ => None,
        }
    }

    fn set(&mut self, field: Field, value: String) -> bool {
        let slot = match field {
            Field::Repository => &mut self.repository,
            Field::IssueTitle => &mut self.issue_title,
            Field::Motivation => &mut self.motivation,
            Field::Proposal => &mut self.proposal,
            _ => return false,
        };
        *slot = value;
        true
    }

    fn repository(&self) -> &str {
        &self.repository
    }

    fn issue_title(&self) -> &str {
        &self.issue_title
    }
}

/// Field values plus which fields the user has touched.
///
/// Errors are only reported for touched fields, the way a rendered form
/// hides messages until a control has been visited.
#[derive(Debug, Clone)]
pub struct Form<T: FormFields> {
    values: T,
    touched: BTreeSet<Field>,
}

impl<T: FormFields> Form<T> {
    pub fn new(values: T) -> Self {
        Self {
            values,
            touched: BTreeSet::new(),
        }
    }

    pub fn values(&self) -> &T {
        &self.values
    }

    pub fn has_field(&self, field: Field) -> bool {
        T::FIELDS.contains(&field)
    }

    /// Write a value without touching the field.
    pub fn set(&mut self, field: Field, value: String) -> bool {
        self.values.set(field, value)
    }

    /// Write a value, mark the field touched and validate it.
    pub fn set_and_touch(&mut self, field: Field, value: String) -> Option<ValidationOutcome> {
        if !self.values.set(field, value) {
            return None;
        }
        self.touched.insert(field);
        self.validate_field(field)
    }

    pub fn validate_field(&self, field: Field) -> Option<ValidationOutcome> {
        self.values.get(field).map(|value| field.validate(value))
    }

    pub fn touch_all(&mut self) {
        self.touched.extend(T::FIELDS.iter().copied());
    }

    pub fn is_touched(&self, field: Field) -> bool {
        self.touched.contains(&field)
    }

    /// Errors for every field, touched or not.
    pub fn errors(&self) -> Vec<(Field, FieldError)> {
        T::FIELDS
            .iter()
            .filter_map(|&field| match self.validate_field(field) {
                Some(Err(error)) => Some((field, error)),
                _ => None,
            })
            .collect()
    }

    /// Errors the rendering layer should show right now.
    pub fn visible_errors(&self) -> Vec<(Field, FieldError)> {
        self.errors()
            .into_iter()
            .filter(|(field, _)| self.is_touched(*field))
            .collect()
    }

    pub fn is_valid(&self) -> bool {
        self.errors().is_empty()
    }
}
