//! Turning octocrab failures into readable messages.

use crate::error::HelperError;

const TOKEN_HINT: &str = "Unauthenticated requests are heavily rate limited. \
Set GITHUB_TOKEN or run: issue-helper config set github.token <token>";

/// Convert an octocrab error, hinting at authentication when rate limited.
pub fn to_helper_error(error: &octocrab::Error) -> HelperError {
    let (message, limited) = match error {
        octocrab::Error::GitHub { source, .. } => {
            let status = source.status_code.as_u16();
            (
                format!("GitHub returned {status}: {}", source.message),
                rate_limited(status, &source.message),
            )
        }
        other => (format!("GitHub request failed: {other}"), false),
    };

    if limited {
        HelperError::Api(format!("{message}\n\n{TOKEN_HINT}"))
    } else {
        HelperError::Api(message)
    }
}

/// 429 always means rate limited. GitHub also answers 403 with a
/// "rate limit" message for unauthenticated callers.
fn rate_limited(status: u16, message: &str) -> bool {
    status == 429 || (status == 403 && message.to_lowercase().contains("rate limit"))
}
