//! Building the prefilled "new issue" URL.

use url::form_urlencoded;

use crate::types::IssueKind;

/// Trailing marker identifying issues filed through this tool.
pub const ISSUE_MARKER: &str = "<!-- generated by ng-yunzai-issue-helper. DO NOT REMOVE -->";

/// Append the marker to a rendered body.
pub fn with_marker(markdown: &str) -> String {
    format!("{markdown}{ISSUE_MARKER}")
}

/// Form-encode a query component. Spaces become `+`.
pub fn encode_component(text: &str) -> String {
    form_urlencoded::byte_serialize(text.as_bytes()).collect()
}

/// Encode the issue body, turning every encoded `+` back into a literal `+`.
pub fn encode_body(text: &str) -> String {
    restore_plus(&encode_component(text))
}

fn restore_plus(encoded: &str) -> String {
    let mut out = String::with_capacity(encoded.len());
    let mut rest = encoded;
    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let escape = rest.get(pos..pos + 3);
        if escape.is_some_and(|e| e.eq_ignore_ascii_case("%2B")) {
            out.push('+');
            rest = &rest[pos + 3..];
        } else {
            out.push('%');
            rest = &rest[pos + 1..];
        }
    }
    out.push_str(rest);
    out
}

/// Compose `<web_base>/<owner>/<repository>/issues/new?title=..&body=..[&labels=..]`.
///
/// `body` must already carry the marker.
pub fn new_issue_url(
    web_base: &str,
    owner: &str,
    repository: &str,
    title: &str,
    body: &str,
    kind: IssueKind,
) -> String {
    let mut url = format!(
        "{}/{}/{}/issues/new?title={}&body={}",
        web_base.trim_end_matches('/'),
        owner,
        repository,
        encode_component(title),
        encode_body(body)
    );
    if let Some(label) = kind.label() {
        url.push_str("&labels=");
        url.push_str(label);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_component_uses_plus_for_space() {
        assert_eq!(encode_component("crash on start"), "crash+on+start");
        assert_eq!(encode_component("a+b"), "a%2Bb");
        assert_eq!(encode_component("x&y=z"), "x%26y%3Dz");
    }

    #[test]
    fn test_encode_body_never_leaves_encoded_plus() {
        let encoded = encode_body("1 + 1 = 2 and C++");
        assert!(!encoded.contains("%2B"));
        assert!(!encoded.contains("%2b"));
        assert_eq!(encoded, "1+++1+%3D+2+and+C++");
    }

    #[test]
    fn test_restore_plus_keeps_other_escapes() {
        assert_eq!(restore_plus("%2b%2B%3D%"), "++%3D%");
    }

    #[test]
    fn test_marker_is_appended() {
        let body = with_marker("### Steps\n\nclick\n\n");
        assert!(body.ends_with(ISSUE_MARKER));
        assert_eq!(body.matches(ISSUE_MARKER).count(), 1);
    }

    #[test]
    fn test_feature_url_has_label() {
        let url = new_issue_url(
            "https://github.com/",
            "hbyunzai",
            "yelon",
            "Dark mode",
            "body",
            IssueKind::Feature,
        );
        assert_eq!(
            url,
            "https://github.com/hbyunzai/yelon/issues/new?title=Dark+mode&body=body&labels=type:feature"
        );
    }

    #[test]
    fn test_bug_url_has_no_label() {
        let url = new_issue_url(
            "https://github.com",
            "hbyunzai",
            "ng-yunzai",
            "Crash",
            "body",
            IssueKind::Bug,
        );
        assert!(!url.contains("labels="));
        assert!(url.starts_with("https://github.com/hbyunzai/ng-yunzai/issues/new?title=Crash&body="));
    }
}
