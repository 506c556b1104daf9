//! replace.rs — `\N` backreference templates and whole-scan replacement.

use crate::model::{MatchRecord, SearchResult};
use crate::pattern::Pattern;
use crate::search::search;

/// The matches of one scan plus the concatenation of every per-match
/// template expansion, in match order, with no separator.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceOutcome {
    pub matches: SearchResult,
    pub replacement: String,
}

/// Expand a replacement template against one match.
///
/// `\N` (a backslash followed by the longest run of decimal digits) is
/// replaced by the text of group N when `1 <= N <=` the match's group
/// count; a group that did not participate expands to the empty string.
/// References outside that range — `\0` included — are passed through
/// literally rather than treated as an error. Everything else, including
/// a trailing lone backslash, is copied verbatim.
///
/// A template with no backreferences comes back unchanged.
pub fn expand_replacement(template: &str, record: &MatchRecord) -> String {
    if !template.contains('\\') {
        return template.to_owned();
    }

    let chars: Vec<char> = template.chars().collect();
    let mut out = String::with_capacity(template.len());
    let mut i = 0;
    while i < chars.len() {
        let is_backref = chars[i] == '\\'
            && chars.get(i + 1).is_some_and(char::is_ascii_digit);
        if !is_backref {
            out.push(chars[i]);
            i += 1;
            continue;
        }

        let digits_start = i + 1;
        let mut j = digits_start;
        while j < chars.len() && chars[j].is_ascii_digit() {
            j += 1;
        }
        let group: Option<usize> = chars[digits_start..j]
            .iter()
            .collect::<String>()
            .parse()
            .ok();
        match group {
            Some(n) if n >= 1 && n <= record.group_count() => {
                if let Some(text) = record.capture(n) {
                    out.push_str(text);
                }
            }
            // out of range: keep the reference as literal text
            _ => out.extend(&chars[i..j]),
        }
        i = j;
    }
    out
}

/// Search, then expand `template` for every match in order.
///
/// An empty template short-circuits: the scan still runs and its result is
/// returned, but no expansion is attempted and the replacement output is
/// empty.
pub fn replace_all(pattern: &Pattern, subject: &str, template: &str) -> ReplaceOutcome {
    let matches = search(pattern, subject);
    if template.is_empty() {
        return ReplaceOutcome {
            matches,
            replacement: String::new(),
        };
    }

    let mut replacement = String::new();
    for record in &matches {
        replacement.push_str(&expand_replacement(template, record));
    }
    ReplaceOutcome {
        matches,
        replacement,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CharSpan;
    use crate::pattern::EngineOpts;

    fn record(text: &str, captures: Vec<Option<&str>>) -> MatchRecord {
        MatchRecord::new(
            CharSpan::try_new(0, text.chars().count()).unwrap(),
            text.to_owned(),
        )
        .with_captures(
            captures
                .into_iter()
                .map(|c| c.map(str::to_owned))
                .collect(),
        )
    }

    #[test]
    fn test_backref_expansion() {
        let rec = record("foobar", vec![Some("foo"), Some("bar")]);
        assert_eq!(expand_replacement("[\\1-\\2]", &rec), "[foo-bar]");
    }

    #[test]
    fn test_template_without_backrefs_unchanged() {
        let rec = record("x", vec![]);
        assert_eq!(expand_replacement("plain text", &rec), "plain text");
        assert_eq!(expand_replacement("", &rec), "");
    }

    #[test]
    fn test_absent_group_expands_to_empty() {
        let rec = record("b", vec![None, Some("b")]);
        assert_eq!(expand_replacement("<\\1|\\2>", &rec), "<|b>");
    }

    #[test]
    fn test_out_of_range_passes_through() {
        let rec = record("ab", vec![Some("a")]);
        assert_eq!(expand_replacement("\\1\\2\\0", &rec), "a\\2\\0");
    }

    #[test]
    fn test_longest_digit_run_wins() {
        // "\12" is one reference to group 12, not "\1" followed by "2";
        // with only one group it falls back to literal text
        let rec = record("ab", vec![Some("a")]);
        assert_eq!(expand_replacement("\\12", &rec), "\\12");
    }

    #[test]
    fn test_lone_and_trailing_backslash_kept() {
        let rec = record("x", vec![Some("y")]);
        assert_eq!(expand_replacement("a\\b", &rec), "a\\b");
        assert_eq!(expand_replacement("tail\\", &rec), "tail\\");
    }

    #[test]
    fn test_replace_all_concatenates_without_separator() {
        let pattern = Pattern::compile("(\\d)(\\w)", EngineOpts::default()).unwrap();
        let outcome = replace_all(&pattern, "1a 2b 3c", "<\\2\\1>");
        assert_eq!(outcome.matches.count(), 3);
        assert_eq!(outcome.replacement, "<a1><b2><c3>");
    }

    #[test]
    fn test_replace_all_empty_template() {
        let pattern = Pattern::compile("a", EngineOpts::default()).unwrap();
        let outcome = replace_all(&pattern, "aaa", "");
        assert_eq!(outcome.matches.count(), 3);
        assert_eq!(outcome.replacement, "");
    }
}
