use thiserror::Error;

use crate::form::{Field, FieldError};
use crate::types::IssueKind;

#[derive(Error, Debug)]
pub enum HelperError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("request timed out after {0} seconds")]
    Timeout(u64),

    #[error("field '{field}' is not part of the {kind} form")]
    UnknownField { field: Field, kind: IssueKind },

    #[error("the {kind} form has invalid fields: {}", format_field_errors(.errors))]
    InvalidForm {
        kind: IssueKind,
        errors: Vec<(Field, FieldError)>,
    },

    #[error("nothing to submit: preview the issue first")]
    NothingToSubmit,

    #[error("could not open browser: {0}")]
    Browser(String),

    #[error("{0}")]
    Other(String),
}

fn format_field_errors(errors: &[(Field, FieldError)]) -> String {
    errors
        .iter()
        .map(|(field, error)| format!("{field} ({error})"))
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, HelperError>;
