mod common;

use common::HelperTest;

const MARKER_ENCODED: &str = "%3C%21--+generated+by+ng-yunzai-issue-helper.+DO+NOT+REMOVE+--%3E";

fn compose_bug<'a>(extra: &[&'a str]) -> Vec<&'a str> {
    let mut args = vec![
        "compose",
        "bug",
        "--title",
        "Table crashes on empty data",
        "--issue-version",
        "v2.0",
        "--browser",
        "Firefox 130",
        "--reproduction",
        "https://stackblitz.com/edit/ng-yunzai-repro",
        "--steps",
        "Open the table page",
        "--expected",
        "An empty table",
        "--actual",
        "A crash",
        "--yes",
        "--no-open",
    ];
    args.extend_from_slice(extra);
    args
}

fn compose_feature<'a>(extra: &[&'a str]) -> Vec<&'a str> {
    let mut args = vec![
        "compose",
        "feature",
        "--title",
        "Dark mode",
        "--motivation",
        "Late night work",
        "--proposal",
        "theme: dark",
        "--yes",
        "--no-open",
    ];
    args.extend_from_slice(extra);
    args
}

#[test]
fn test_help_lists_commands() {
    let test = HelperTest::new();
    let output = test.run_success(&["--help"]);
    for command in ["new", "compose", "search", "releases", "config"] {
        assert!(output.contains(command), "help is missing {command}");
    }
}

#[test]
fn test_compose_feature_adds_label() {
    let test = HelperTest::new();
    let url = test.run_success(&compose_feature(&[]));
    let url = url.trim();

    assert!(url.starts_with("https://github.com/hbyunzai/ng-yunzai/issues/new?title=Dark+mode&body="));
    assert!(url.ends_with(&format!("{MARKER_ENCODED}&labels=type:feature")));
}

#[test]
fn test_compose_bug_has_no_label() {
    let test = HelperTest::new();
    let url = test.run_success(&compose_bug(&[]));
    let url = url.trim();

    assert!(url.starts_with(
        "https://github.com/hbyunzai/ng-yunzai/issues/new?title=Table+crashes+on+empty+data&body="
    ));
    assert!(url.ends_with(MARKER_ENCODED));
    assert!(!url.contains("labels="));
    assert!(!url.contains("%2B"));
}

#[test]
fn test_compose_bug_rejects_starter_link() {
    let test = HelperTest::new();
    let stderr = test.run_failure(&compose_bug(&[
        "--reproduction",
        "https://stackblitz.com/edit/ng-yunzai-setup",
    ]));
    assert!(stderr.contains("reproduction"));
    assert!(stderr.contains("invalid format"));
}

#[test]
fn test_compose_bug_rejects_unsupported_link() {
    let test = HelperTest::new();
    let stderr = test.run_failure(&compose_bug(&[
        "--reproduction",
        "https://example.com/my-demo",
    ]));
    assert!(stderr.contains("reproduction"));
}

#[test]
fn test_compose_reports_missing_fields() {
    let test = HelperTest::new();
    let stderr = test.run_failure(&["compose", "feature", "--title", "Dark mode", "--yes", "--no-open"]);
    assert!(stderr.contains("motivation"));
    assert!(stderr.contains("proposal"));
    assert!(stderr.contains("this field is required"));
}

#[test]
fn test_compose_rejects_field_of_other_form() {
    let test = HelperTest::new();
    let stderr = test.run_failure(&compose_feature(&["--steps", "click"]));
    assert!(stderr.contains("not part of the feature form"));
}

#[test]
fn test_compose_to_other_repository() {
    let test = HelperTest::new();
    let url = test.run_success(&compose_feature(&["--repo", "yelon"]));
    assert!(url.trim().starts_with("https://github.com/hbyunzai/yelon/issues/new?"));
}

#[test]
fn test_compose_rejects_unknown_repository() {
    let test = HelperTest::new();
    let stderr = test.run_failure(&compose_feature(&["--repo", "elsewhere"]));
    assert!(stderr.contains("unknown repository"));
}

#[test]
fn test_new_rejects_unknown_repository() {
    let test = HelperTest::new();
    test.write_config("api_base_url: http://127.0.0.1:9\n");
    let stderr = test.run_failure(&["new", "feature", "--repo", "elsewhere", "--no-open"]);
    assert!(stderr.contains("unknown repository 'elsewhere'"));
}

#[test]
fn test_new_fails_on_closed_input() {
    let test = HelperTest::new();
    test.write_config("api_base_url: http://127.0.0.1:9\n");
    let stderr = test.run_failure(&["new", "feature", "--repo", "ng-yunzai", "--no-open"]);
    assert!(stderr.contains("input closed"));
}

#[test]
fn test_compose_json_output() {
    let test = HelperTest::new();
    let output = test.run_success(&compose_feature(&["--json"]));
    let json: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert_eq!(json["kind"], "feature");
    assert_eq!(json["repository"], "ng-yunzai");
    assert_eq!(json["title"], "Dark mode");
    assert!(json["url"].as_str().unwrap().ends_with("&labels=type:feature"));
}

#[test]
fn test_compose_uses_configured_web_base() {
    let test = HelperTest::new();
    test.write_config("owner: acme\nweb_base_url: https://git.example.com/\n");

    let url = test.run_success(&compose_feature(&[]));
    assert!(url.trim().starts_with("https://git.example.com/acme/ng-yunzai/issues/new?"));
}

#[test]
fn test_config_set_and_get() {
    let test = HelperTest::new();
    test.run_success(&["config", "set", "owner", "someone"]);
    test.run_success(&["config", "set", "labels.issue.create", "Erstellen"]);

    assert_eq!(test.run_success(&["config", "get", "owner"]).trim(), "someone");
    assert_eq!(
        test.run_success(&["config", "get", "labels.issue.create"]).trim(),
        "Erstellen"
    );
    assert!(test.read_config().contains("owner: someone"));
}

#[test]
fn test_config_token_is_masked() {
    let test = HelperTest::new();
    assert_eq!(
        test.run_success(&["config", "get", "github.token"]).trim(),
        "not configured"
    );

    test.run_success(&["config", "set", "github.token", "ghp_abcdef123"]);
    let value = test.run_success(&["config", "get", "github.token"]);
    assert_eq!(value.trim(), "gh...23");

    let show = test.run_success(&["config", "show"]);
    assert!(!show.contains("ghp_abcdef123"));
}

#[test]
fn test_config_set_rejects_invalid_values() {
    let test = HelperTest::new();
    let stderr = test.run_failure(&["config", "set", "search.limit", "0"]);
    assert!(stderr.contains("search.limit"));

    let stderr = test.run_failure(&["config", "set", "no_such_key", "x"]);
    assert!(stderr.contains("unknown config key"));
}

#[test]
fn test_config_show_json() {
    let test = HelperTest::new();
    let output = test.run_success(&["config", "show", "--json"]);
    let json: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert_eq!(json["owner"], "hbyunzai");
    assert_eq!(json["search"]["debounce_ms"], 300);
    assert_eq!(json["auth"]["github_token_configured"], false);
}

#[test]
fn test_invalid_config_file_fails() {
    let test = HelperTest::new();
    test.write_config("search:\n  limit: 0\n");
    let stderr = test.run_failure(&["config", "show"]);
    assert!(stderr.contains("search.limit"));
}
