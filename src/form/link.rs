//! Reproduction link validation.
//!
//! A bug report must point at a runnable reproduction hosted somewhere the
//! maintainers can open it. The untouched starter project does not count.

use std::sync::LazyLock;

use regex::Regex;

use super::{FieldError, ValidationOutcome};

/// Hosts accepted for a reproduction.
static REPRODUCTION_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^https?://(?:(?:www\.)?github\.com/[^/\s]+/[^/\s]+|gist\.github\.com/\S+|(?:www\.)?stackblitz\.com/edit/\S+|[\w-]+\.stackblitz\.io(?:/\S*)?|codesandbox\.io/s/\S+|(?:www\.)?gitee\.com/[^/\s]+/[^/\s]+)\S*$",
    )
    .expect("reproduction link regex should be valid")
});

/// The starter template users copy without forking.
static COPIED_STARTER_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^https?://(?:www\.)?stackblitz\.com/edit/ng-yunzai-setup/?(?:[?#]\S*)?$")
        .expect("starter link regex should be valid")
});

/// Validates a user-supplied reproduction link.
///
/// # Returns
/// * `Err(FieldError::Required)` if empty or whitespace-only
/// * `Err(FieldError::InvalidFormat)` if the host is not accepted or the link
///   is the unmodified starter project
/// * `Ok(())` otherwise
pub fn validate_reproduction_link(value: &str) -> ValidationOutcome {
    let value = value.trim();
    if value.is_empty() {
        return Err(FieldError::Required);
    }
    if !REPRODUCTION_LINK.is_match(value) || COPIED_STARTER_LINK.is_match(value) {
        return Err(FieldError::InvalidFormat);
    }
    Ok(())
}
