//! search.rs — the forward scan loop and context samples.

use crate::model::{CharSpan, MatchRecord, SearchResult};
use crate::pattern::Pattern;

/// Default number of context chars on each side of a match sample.
pub const SAMPLE_RADIUS: usize = 10;

/// Enumerate every non-overlapping match of `pattern` in `subject`, left
/// to right.
///
/// Policy decisions this loop owns:
/// - An empty subject always produces an empty result, without consulting
///   the matcher, even for patterns that match the empty string.
/// - After a match at `start` of length `len`, the scan resumes at
///   `start + max(len, 1)`, so zero-length matches (`a*` on `"bbb"`)
///   cannot stall the loop. A zero-length match at end-of-subject is
///   still reported.
///
/// Total for any compiled `Pattern`; the result upholds the strictly
/// increasing, non-overlapping ordering invariant of `SearchResult`.
pub fn search(pattern: &Pattern, subject: &str) -> SearchResult {
    let mut result = SearchResult::empty();
    if subject.is_empty() {
        return result;
    }

    let chars: Vec<char> = subject.chars().collect();
    let mut matcher = pattern.matcher(&chars);

    let mut at = 0usize;
    while at <= chars.len() {
        let Some(state) = matcher.match_at(at) else {
            at += 1;
            continue;
        };

        let span = CharSpan {
            start: at,
            end: state.end,
        };
        let text: String = chars[span.to_range()].iter().collect();
        let captures = state
            .captures
            .iter()
            .map(|cap| cap.map(|s| chars[s.to_range()].iter().collect()))
            .collect();
        result.push(MatchRecord::new(span, text).with_captures(captures));

        at += span.len().max(1);
    }
    result
}

/// The chars surrounding a match: up to `radius` before the start and up
/// to `radius` after the end, clipped at the subject bounds and
/// concatenated. The matched text itself is not included.
///
/// Pure slicing; never fails, even for spans at (or past) the edges.
pub fn context_sample(subject: &str, record: &MatchRecord, radius: usize) -> String {
    let (before, after) = context_parts(subject, record.span, radius);
    before + &after
}

/// The before/after halves of a context sample, kept separate so a
/// renderer can re-insert the matched text between them.
pub(crate) fn context_parts(subject: &str, span: CharSpan, radius: usize) -> (String, String) {
    let chars: Vec<char> = subject.chars().collect();
    let span = span.clamp_to_len(chars.len());
    let left = span.start.saturating_sub(radius);
    let right = span.end.saturating_add(radius).min(chars.len());
    let before: String = chars[left..span.start].iter().collect();
    let after: String = chars[span.end..right].iter().collect();
    (before, after)
}
