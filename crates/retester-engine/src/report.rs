//! report.rs — plain-text rendering of a scan, in the layout the tester's
//! result pane shows.
//!
//! One entry per match:
//!
//! ```text
//! 1. Match: "abc" At: 3, Sample: "xx abc yy"
//! Caps:
//! 1) "a"
//! 2) "c"
//! ```
//!
//! Entries are separated by a blank line; the `Caps:` block only appears
//! when the match carries capture groups. An empty result renders as
//! `No results`. The sample shows the matched text with its surrounding
//! context re-attached on both sides.

use std::fmt::Write as _;

use crate::model::SearchResult;
use crate::search::context_parts;

/// The counter line shown next to the results (`"Results: 3"`).
#[must_use]
pub fn results_label(count: usize) -> String {
    format!("Results: {count}")
}

/// Render every match as numbered plain text.
#[must_use]
pub fn render_report(subject: &str, result: &SearchResult, radius: usize) -> String {
    if result.is_empty() {
        return "No results".to_owned();
    }

    let mut out = String::new();
    for (i, record) in result.iter().enumerate() {
        if i > 0 {
            out.push_str("\n\n");
        }
        let (before, after) = context_parts(subject, record.span, radius);
        let _ = write!(
            out,
            "{}. Match: \"{}\" At: {}, Sample: \"{}{}{}\"",
            i + 1,
            record.text,
            record.start(),
            before,
            record.text,
            after
        );
        if record.group_count() > 0 {
            out.push_str("\nCaps:");
            for (g, cap) in record.captures.iter().enumerate() {
                let _ = write!(out, "\n{}) \"{}\"", g + 1, cap.as_deref().unwrap_or(""));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::{EngineOpts, Pattern};
    use crate::search::{search, SAMPLE_RADIUS};

    fn scan(pattern: &str, subject: &str) -> SearchResult {
        let p = Pattern::compile(pattern, EngineOpts::default()).unwrap();
        search(&p, subject)
    }

    #[test]
    fn test_no_results() {
        let result = scan("z", "abc");
        assert_eq!(render_report("abc", &result, SAMPLE_RADIUS), "No results");
    }

    #[test]
    fn test_single_match_without_groups() {
        let subject = "xx abc yy";
        let result = scan("abc", subject);
        assert_eq!(
            render_report(subject, &result, SAMPLE_RADIUS),
            "1. Match: \"abc\" At: 3, Sample: \"xx abc yy\""
        );
    }

    #[test]
    fn test_entries_and_caps_blocks() {
        let subject = "1a 2b";
        let result = scan("(\\d)(\\w)", subject);
        let report = render_report(subject, &result, SAMPLE_RADIUS);
        let expected = "1. Match: \"1a\" At: 0, Sample: \"1a 2b\"\n\
                        Caps:\n\
                        1) \"1\"\n\
                        2) \"a\"\n\
                        \n\
                        2. Match: \"2b\" At: 3, Sample: \"1a 2b\"\n\
                        Caps:\n\
                        1) \"2\"\n\
                        2) \"b\"";
        assert_eq!(report, expected);
    }

    #[test]
    fn test_absent_capture_renders_empty() {
        let subject = "b";
        let result = scan("(a)|(b)", subject);
        let report = render_report(subject, &result, SAMPLE_RADIUS);
        assert!(report.contains("1) \"\""));
        assert!(report.contains("2) \"b\""));
    }

    #[test]
    fn test_results_label() {
        assert_eq!(results_label(0), "Results: 0");
        assert_eq!(results_label(12), "Results: 12");
    }
}
