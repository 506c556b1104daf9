//! The engine behind a tiny interactive regexp tester.
//!
//! Compile a pattern with options, enumerate every non-overlapping match
//! with its captures, build context samples, and expand `\N` replacement
//! templates. The matcher is owned by this crate: a recursive-descent
//! parser plus a backtracking evaluator with capture slots.
//!
//! The UI that collects input, re-runs the search on edits and highlights
//! the `[start, start+len)` spans is a separate concern; it drives this
//! crate through [`run`] or through `Pattern::compile` / [`search`] /
//! [`replace_all`] directly. Everything here is synchronous, value-shaped
//! and free of shared state, so concurrent scans with separate patterns
//! need no locking.

pub mod error;
pub mod model;
pub mod pattern;
pub mod replace;
pub mod report;
pub mod search;

pub use error::{Error, Result};
pub use model::{CharSpan, MatchRecord, SearchResult};
pub use pattern::{EngineOpts, Pattern};
pub use replace::{expand_replacement, replace_all, ReplaceOutcome};
pub use report::{render_report, results_label};
pub use search::{context_sample, search, SAMPLE_RADIUS};

/// Parameters for one search-and-preview pass.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchRequest {
    /// Pattern text to compile.
    pub pattern: String,
    /// Subject text to scan.
    pub subject: String,
    /// Replacement template; `None` or empty skips replacement.
    pub replace: Option<String>,
    /// Compilation options.
    pub engine_opts: EngineOpts,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            pattern: String::new(),
            subject: String::new(),
            replace: None,
            engine_opts: EngineOpts::default(),
        }
    }
}

/// Everything one pass produced, ready to render.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// The matches, in discovery order.
    pub matches: SearchResult,
    /// Concatenated template expansions, when a template was supplied.
    pub replacement: Option<String>,
    /// Plain-text report of the matches (`report::render_report`).
    pub report: String,
}

/// Compile, scan and (optionally) expand in one call.
///
/// A blank pattern or blank subject short-circuits to an empty response,
/// the way the interactive tool clears its result pane on blank input.
/// Compile errors surface as `Error::InvalidPattern` for the caller to
/// display in place of results; nothing else in the pipeline can fail.
pub fn run(req: &SearchRequest) -> Result<SearchResponse> {
    if req.pattern.is_empty() || req.subject.is_empty() {
        return Ok(SearchResponse {
            matches: SearchResult::empty(),
            replacement: None,
            report: String::new(),
        });
    }

    let pattern = Pattern::compile(&req.pattern, req.engine_opts)?;
    let (matches, replacement) = match req.replace.as_deref() {
        Some(template) if !template.is_empty() => {
            let outcome = replace_all(&pattern, &req.subject, template);
            (outcome.matches, Some(outcome.replacement))
        }
        _ => (search(&pattern, &req.subject), None),
    };
    let report = render_report(&req.subject, &matches, SAMPLE_RADIUS);
    Ok(SearchResponse {
        matches,
        replacement,
        report,
    })
}

pub mod prelude {
    //! Common imports for consumers of this crate.
    pub use super::{
        context_sample, expand_replacement, render_report, replace_all, results_label, run, search,
        CharSpan, EngineOpts, Error, MatchRecord, Pattern, ReplaceOutcome, Result, SearchRequest,
        SearchResponse, SearchResult, SAMPLE_RADIUS,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_search_only() {
        let req = SearchRequest {
            pattern: "\\d+".into(),
            subject: "a 12 b 345".into(),
            ..SearchRequest::default()
        };
        let resp = run(&req).unwrap();
        assert_eq!(resp.matches.count(), 2);
        assert_eq!(resp.replacement, None);
        assert!(resp.report.starts_with("1. Match: \"12\" At: 2,"));
    }

    #[test]
    fn test_run_with_replacement() {
        let req = SearchRequest {
            pattern: "(\\w)(\\d)".into(),
            subject: "a1 b2".into(),
            replace: Some("\\2\\1".into()),
            ..SearchRequest::default()
        };
        let resp = run(&req).unwrap();
        assert_eq!(resp.matches.count(), 2);
        assert_eq!(resp.replacement.as_deref(), Some("1a2b"));
    }

    #[test]
    fn test_run_blank_inputs_do_nothing() {
        for (pattern, subject) in [("", "text"), ("a", ""), ("", "")] {
            let resp = run(&SearchRequest {
                pattern: pattern.into(),
                subject: subject.into(),
                ..SearchRequest::default()
            })
            .unwrap();
            assert_eq!(resp.matches.count(), 0);
            assert_eq!(resp.report, "");
        }
    }

    #[test]
    fn test_run_surfaces_invalid_pattern() {
        let req = SearchRequest {
            pattern: "(".into(),
            subject: "text".into(),
            ..SearchRequest::default()
        };
        assert!(matches!(run(&req), Err(Error::InvalidPattern(_))));
    }

    #[test]
    fn test_request_serde_shape() {
        let req: SearchRequest =
            serde_json::from_str(r#"{"pattern":"a","subject":"ab","engineOpts":{"caseSensitive":false,"greedy":false}}"#)
                .unwrap();
        assert_eq!(req.pattern, "a");
        assert!(!req.engine_opts.case_sensitive);
        assert!(!req.engine_opts.greedy);
        assert_eq!(req.replace, None);

        let json = serde_json::to_string(&SearchRequest::default()).unwrap();
        assert!(json.contains("\"engineOpts\""));
        assert!(json.contains("\"caseSensitive\":true"));
    }
}
