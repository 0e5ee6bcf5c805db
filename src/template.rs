//! Markdown templates for the issue body.
//!
//! Callers validate the form first; these functions format whatever they
//! are given.

use std::fmt::Write;

use crate::form::{BugFormFields, FeatureFormFields};

/// Render a bug report body.
pub fn render_bug(fields: &BugFormFields) -> String {
    let mut out = String::new();

    section(&mut out, "Reproduction link", &link(fields.reproduction.trim()));
    section(&mut out, "Steps to reproduce", &fields.steps);
    section(&mut out, "What is expected?", &fields.expected);
    section(&mut out, "What is actually happening?", &fields.actual);

    let _ = writeln!(out, "| Environment | Info |");
    let _ = writeln!(out, "|---|---|");
    let _ = writeln!(
        out,
        "| {} | {} |",
        table_cell(&fields.repository),
        table_cell(&fields.version)
    );
    let _ = writeln!(out, "| Browser | {} |", table_cell(&fields.browser));
    out.push('\n');

    if let Some(extra) = fields.extra.as_deref().filter(|e| !e.trim().is_empty()) {
        out.push_str("---\n\n");
        section(&mut out, "Other", extra);
    }

    out
}

/// Render a feature request body.
pub fn render_feature(fields: &FeatureFormFields) -> String {
    let mut out = String::new();
    section(
        &mut out,
        "What problem does this feature solve?",
        &fields.motivation,
    );
    section(
        &mut out,
        "What does the proposed API look like?",
        &fields.proposal,
    );
    out
}

fn section(out: &mut String, heading: &str, body: &str) {
    let _ = writeln!(out, "### {heading}\n");
    let _ = writeln!(out, "{}\n", body.trim_end());
}

fn link(url: &str) -> String {
    format!("[{url}]({url})")
}

/// Keep table rows on one line.
fn table_cell(value: &str) -> String {
    value.trim().replace('|', "\\|").replace(['\r', '\n'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bug() -> BugFormFields {
        BugFormFields {
            repository: "ng-yunzai".to_string(),
            issue_title: "Table crashes".to_string(),
            version: "v2.0".to_string(),
            browser: "Chrome 120".to_string(),
            reproduction: "https://stackblitz.com/edit/repro-1".to_string(),
            steps: "1. open\n2. click".to_string(),
            expected: "nothing".to_string(),
            actual: "crash".to_string(),
            extra: None,
        }
    }

    #[test]
    fn test_render_bug_layout() {
        let body = render_bug(&bug());
        assert!(body.starts_with(
            "### Reproduction link\n\n[https://stackblitz.com/edit/repro-1](https://stackblitz.com/edit/repro-1)\n\n"
        ));
        assert!(body.contains("### Steps to reproduce\n\n1. open\n2. click\n\n"));
        assert!(body.contains("### What is expected?\n\nnothing\n\n"));
        assert!(body.contains("### What is actually happening?\n\ncrash\n\n"));
        assert!(body.contains("| ng-yunzai | v2.0 |\n| Browser | Chrome 120 |\n"));
        assert!(!body.contains("### Other"));
    }

    #[test]
    fn test_render_bug_with_extra() {
        let mut fields = bug();
        fields.extra = Some("Only on Windows".to_string());
        let body = render_bug(&fields);
        assert!(body.ends_with("---\n\n### Other\n\nOnly on Windows\n\n"));
    }

    #[test]
    fn test_table_cells_stay_on_one_line() {
        let mut fields = bug();
        fields.browser = "Edge\n| 121".to_string();
        let body = render_bug(&fields);
        assert!(body.contains("| Browser | Edge \\| 121 |\n"));
    }

    #[test]
    fn test_render_feature_layout() {
        let fields = FeatureFormFields {
            repository: "yelon".to_string(),
            issue_title: "Dark mode".to_string(),
            motivation: "Eyes hurt".to_string(),
            proposal: "theme: 'dark'".to_string(),
        };
        assert_eq!(
            render_feature(&fields),
            "### What problem does this feature solve?\n\nEyes hurt\n\n### What does the proposed API look like?\n\ntheme: 'dark'\n\n"
        );
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let fields = bug();
        assert_eq!(render_bug(&fields), render_bug(&fields.clone()));
    }
}
