//! model.rs — value types produced by a single search invocation
//!
//! CharSpan: char-precise half-open ranges into the subject text
//! MatchRecord: one concrete match (+ captures)
//! SearchResult: all matches of one scan, in discovery order
//!
//! Everything here is value-shaped: produced by the engine, consumed by the
//! caller, never mutated in place across invocations.

use std::ops::Range;

use crate::error::{Error, Result};

/// Half-open range `[start, end)` into the subject text.
///
/// Invariants:
/// - Units are **chars** (Unicode scalar values), not bytes. The engine
///   works on the decoded subject so a span can be handed straight to a
///   caller that addresses text by character position.
/// - `start <= end` always holds (empty spans are allowed).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Ord, PartialOrd, serde::Serialize, serde::Deserialize)]
pub struct CharSpan {
    pub start: usize,
    pub end: usize,
}

impl CharSpan {
    /// Create a span if `end >= start`; returns `InvalidRange` if not.
    #[inline]
    pub fn try_new(start: usize, end: usize) -> Result<Self> {
        if end < start {
            return Err(Error::InvalidRange(start, end));
        }
        Ok(Self { start, end })
    }

    /// Length in chars: `end - start` (0 for empty).
    #[inline]
    #[must_use]
    pub fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// True if the span is empty (start == end).
    #[inline]
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// True if half-open intervals overlap:
    /// `self.start < other.end && other.start < self.end`.
    #[inline]
    #[must_use]
    pub fn overlaps(self, other: &CharSpan) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Clamp both ends into `[0, len]`. Returns a valid (possibly empty) span.
    #[inline]
    #[must_use]
    pub fn clamp_to_len(self, len: usize) -> CharSpan {
        CharSpan {
            start: self.start.min(len),
            end: self.end.min(len),
        }
    }

    /// Convert to `Range<usize>`.
    #[inline]
    #[must_use]
    pub fn to_range(self) -> Range<usize> {
        self.start..self.end
    }
}

impl TryFrom<Range<usize>> for CharSpan {
    type Error = Error;

    #[inline]
    fn try_from(r: Range<usize>) -> Result<Self> {
        CharSpan::try_new(r.start, r.end)
    }
}

impl From<CharSpan> for Range<usize> {
    #[inline]
    fn from(s: CharSpan) -> Self {
        s.start..s.end
    }
}

/// One concrete match found by the engine.
///
/// - `span` is the whole match (group 0) in char offsets.
/// - `text` is the matched substring, owned so the record outlives the scan.
/// - `captures`: index 0 corresponds to group 1, index 1 to group 2, etc.
///   `None` marks a group that did not participate in this match (an
///   alternation branch not taken), which is distinct from `Some("")`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    pub span: CharSpan,
    pub text: String,
    pub captures: Vec<Option<String>>,
}

impl MatchRecord {
    /// Build from the whole-match span and text only.
    #[inline]
    pub fn new(span: CharSpan, text: String) -> Self {
        Self {
            span,
            text,
            captures: Vec::new(),
        }
    }

    /// Attach capture texts (builder-style; consumes `self`).
    #[inline]
    #[must_use]
    pub fn with_captures(mut self, captures: Vec<Option<String>>) -> Self {
        self.captures = captures;
        self
    }

    /// Char offset where the match starts.
    #[inline]
    #[must_use]
    pub fn start(&self) -> usize {
        self.span.start
    }

    /// Match length in chars.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.span.len()
    }

    /// True for a zero-length match.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.span.is_empty()
    }

    /// Number of capture groups recorded for this match.
    #[inline]
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.captures.len()
    }

    /// Text of group `i` (1-based) if the group participated in the match.
    ///
    /// `capture(0)` returns the whole match.
    #[inline]
    #[must_use]
    pub fn capture(&self, i: usize) -> Option<&str> {
        if i == 0 {
            return Some(&self.text);
        }
        self.captures
            .get(i - 1)
            .and_then(|c| c.as_deref())
    }
}

/// All matches of one scan over one subject, in left-to-right discovery
/// order.
///
/// Invariants (upheld by the scan loop, asserted in debug builds):
/// - start offsets are strictly increasing;
/// - no two matches overlap.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SearchResult {
    matches: Vec<MatchRecord>,
}

impl SearchResult {
    /// Empty result (what an empty subject always produces).
    #[inline]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Append a record found to the right of every existing one.
    pub(crate) fn push(&mut self, record: MatchRecord) {
        if let Some(last) = self.matches.last() {
            debug_assert!(last.span.start < record.span.start);
            debug_assert!(!last.span.overlaps(&record.span));
        }
        self.matches.push(record);
    }

    /// Number of matches found.
    #[inline]
    #[must_use]
    pub fn count(&self) -> usize {
        self.matches.len()
    }

    /// True when the scan found nothing.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// The records in discovery order.
    #[inline]
    #[must_use]
    pub fn matches(&self) -> &[MatchRecord] {
        &self.matches
    }

    /// Iterate the records in discovery order.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, MatchRecord> {
        self.matches.iter()
    }
}

impl<'a> IntoIterator for &'a SearchResult {
    type Item = &'a MatchRecord;
    type IntoIter = std::slice::Iter<'a, MatchRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.matches.iter()
    }
}
