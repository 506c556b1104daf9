//! matcher.rs — backtracking evaluation of a parsed pattern.
//!
//! The matcher walks the AST with an explicit continuation chain built on
//! the call stack, so alternation and quantifiers backtrack by returning
//! `None` and letting the caller try the next choice. Capture slots are
//! mutated in place and restored on every failing branch.
//!
//! Invariants:
//! - `match_at` only ever reports a match that begins exactly at the
//!   requested offset; the scan loop owns the forward search.
//! - A quantifier iteration that consumes no input ends the loop, so
//!   patterns like `(a*)*` terminate and `a*` yields empty matches.
//! - Repeats over a single-char body (`a+`, `\w*`, `.{2,5}`) are resolved
//!   by position in one frame for the whole run, so long subjects do not
//!   deepen the stack.
//! - Recursion is capped at `MAX_MATCH_DEPTH`, with every frame counted,
//!   including continuation frames; branches beyond the cap are pruned
//!   rather than overflowing the stack.

use crate::model::CharSpan;

use super::ast::{char_eq, Ast, Repeat};

/// Ceiling on matcher recursion. Every frame counts against it, so it
/// bounds peak stack use; pathological pattern/subject pairs fail to
/// match past this point instead of aborting the process.
const MAX_MATCH_DEPTH: usize = 2_500;

/// A successful match attempt at one offset.
pub(crate) struct MatchState {
    /// Char offset one past the matched text.
    pub(crate) end: usize,
    /// Index 0 corresponds to group 1; `None` = did not participate.
    pub(crate) captures: Vec<Option<CharSpan>>,
}

/// What to do after the current node matches. Frames live on the Rust call
/// stack and chain backwards to the match entry point.
enum Cont<'a> {
    /// Nothing left: the overall attempt succeeds.
    Done,
    /// Match `nodes` in order, then continue with `next`.
    Seq { nodes: &'a [Ast], next: &'a Cont<'a> },
    /// Record the end of capture group `group`, then continue.
    Close { group: usize, next: &'a Cont<'a> },
    /// One quantifier iteration finished; decide whether to loop again.
    Loop {
        rep: &'a Repeat,
        count: u32,
        /// Where the finished iteration started; equality with the current
        /// position means it consumed nothing.
        entry: usize,
        next: &'a Cont<'a>,
    },
}

/// One-subject matcher. Reused across scan offsets; `match_at` resets the
/// capture slots each time.
pub(crate) struct Matcher<'s, 'p> {
    subject: &'s [char],
    root: &'p Ast,
    fold: bool,
    greedy: bool,
    starts: Vec<Option<usize>>,
    ends: Vec<Option<usize>>,
    depth: usize,
}

impl<'s, 'p> Matcher<'s, 'p> {
    pub(crate) fn new(
        root: &'p Ast,
        group_count: usize,
        subject: &'s [char],
        fold: bool,
        greedy: bool,
    ) -> Self {
        Self {
            subject,
            root,
            fold,
            greedy,
            starts: vec![None; group_count],
            ends: vec![None; group_count],
            depth: 0,
        }
    }

    /// Try to match starting exactly at `start`. Returns the match end and
    /// the capture spans on success.
    pub(crate) fn match_at(&mut self, start: usize) -> Option<MatchState> {
        self.starts.fill(None);
        self.ends.fill(None);
        self.depth = 0;

        let root = self.root;
        let end = self.match_node(root, start, &Cont::Done)?;

        let captures = self
            .starts
            .iter()
            .zip(&self.ends)
            .map(|(s, e)| match (s, e) {
                (Some(s), Some(e)) => Some(CharSpan { start: *s, end: *e }),
                _ => None,
            })
            .collect();
        Some(MatchState { end, captures })
    }

    fn match_node(&mut self, node: &Ast, pos: usize, k: &Cont<'_>) -> Option<usize> {
        if self.depth >= MAX_MATCH_DEPTH {
            return None;
        }
        self.depth += 1;
        let result = self.match_node_inner(node, pos, k);
        self.depth -= 1;
        result
    }

    fn match_node_inner(&mut self, node: &Ast, pos: usize, k: &Cont<'_>) -> Option<usize> {
        match node {
            Ast::Empty => self.match_cont(k, pos),
            Ast::Literal(c) => {
                if pos < self.subject.len() && char_eq(*c, self.subject[pos], self.fold) {
                    self.match_cont(k, pos + 1)
                } else {
                    None
                }
            }
            Ast::AnyChar => {
                if pos < self.subject.len() && self.subject[pos] != '\n' {
                    self.match_cont(k, pos + 1)
                } else {
                    None
                }
            }
            Ast::Class(cls) => {
                if pos < self.subject.len() && cls.matches(self.subject[pos], self.fold) {
                    self.match_cont(k, pos + 1)
                } else {
                    None
                }
            }
            Ast::StartAnchor => {
                if pos == 0 {
                    self.match_cont(k, pos)
                } else {
                    None
                }
            }
            Ast::EndAnchor => {
                if pos == self.subject.len() {
                    self.match_cont(k, pos)
                } else {
                    None
                }
            }
            Ast::WordBoundary { negated } => {
                if self.at_word_boundary(pos) != *negated {
                    self.match_cont(k, pos)
                } else {
                    None
                }
            }
            Ast::Backref(n) => self.match_backref(*n, pos, k),
            Ast::Group { index: None, inner } => self.match_node(inner, pos, k),
            Ast::Group {
                index: Some(i),
                inner,
            } => {
                let g = i - 1;
                let saved = (self.starts[g], self.ends[g]);
                self.starts[g] = Some(pos);
                self.ends[g] = None;
                let close = Cont::Close { group: g, next: k };
                match self.match_node(inner, pos, &close) {
                    Some(end) => Some(end),
                    None => {
                        (self.starts[g], self.ends[g]) = saved;
                        None
                    }
                }
            }
            Ast::Concat(nodes) => {
                let seq = Cont::Seq {
                    nodes: nodes.as_slice(),
                    next: k,
                };
                self.match_cont(&seq, pos)
            }
            Ast::Alternate(branches) => branches
                .iter()
                .find_map(|branch| self.match_node(branch, pos, k)),
            Ast::Repeat(rep) => self.match_repeat(rep, 0, pos, k),
        }
    }

    fn match_cont(&mut self, cont: &Cont<'_>, pos: usize) -> Option<usize> {
        if self.depth >= MAX_MATCH_DEPTH {
            return None;
        }
        self.depth += 1;
        let result = self.match_cont_inner(cont, pos);
        self.depth -= 1;
        result
    }

    fn match_cont_inner(&mut self, cont: &Cont<'_>, pos: usize) -> Option<usize> {
        match cont {
            Cont::Done => Some(pos),
            Cont::Seq { nodes, next } => match nodes.split_first() {
                None => self.match_cont(next, pos),
                Some((head, rest)) => {
                    let seq = Cont::Seq { nodes: rest, next: *next };
                    self.match_node(head, pos, &seq)
                }
            },
            Cont::Close { group, next } => {
                let saved = self.ends[*group];
                self.ends[*group] = Some(pos);
                match self.match_cont(next, pos) {
                    Some(end) => Some(end),
                    None => {
                        self.ends[*group] = saved;
                        None
                    }
                }
            }
            Cont::Loop {
                rep,
                count,
                entry,
                next,
            } => {
                if pos == *entry {
                    // empty iteration: further copies would also be empty
                    self.match_cont(next, pos)
                } else {
                    self.match_repeat(rep, *count, pos, next)
                }
            }
        }
    }

    fn match_repeat(
        &mut self,
        rep: &Repeat,
        count: u32,
        pos: usize,
        k: &Cont<'_>,
    ) -> Option<usize> {
        if self.depth >= MAX_MATCH_DEPTH {
            return None;
        }
        self.depth += 1;
        let result = if consumes_one_char(&rep.inner) {
            self.match_atom_run(rep, count, pos, k)
        } else {
            self.match_repeat_inner(rep, count, pos, k)
        };
        self.depth -= 1;
        result
    }

    /// Repeats whose body consumes exactly one char are resolved by
    /// position: eat the longest run the body accepts, then backtrack
    /// over its length. The whole run costs one frame, not several per
    /// consumed char.
    fn match_atom_run(
        &mut self,
        rep: &Repeat,
        count: u32,
        pos: usize,
        k: &Cont<'_>,
    ) -> Option<usize> {
        let mut limit = self.subject.len() - pos;
        if let Some(max) = rep.max {
            limit = limit.min(max.saturating_sub(count) as usize);
        }
        let mut run = 0usize;
        while run < limit && self.atom_matches(&rep.inner, pos + run) {
            run += 1;
        }
        let need = rep.min.saturating_sub(count) as usize;
        if run < need {
            return None;
        }
        if self.greedy {
            (need..=run).rev().find_map(|n| self.match_cont(k, pos + n))
        } else {
            (need..=run).find_map(|n| self.match_cont(k, pos + n))
        }
    }

    fn atom_matches(&self, atom: &Ast, pos: usize) -> bool {
        let c = self.subject[pos];
        match atom {
            Ast::Literal(l) => char_eq(*l, c, self.fold),
            Ast::AnyChar => c != '\n',
            Ast::Class(cls) => cls.matches(c, self.fold),
            _ => false,
        }
    }

    fn match_repeat_inner(
        &mut self,
        rep: &Repeat,
        count: u32,
        pos: usize,
        k: &Cont<'_>,
    ) -> Option<usize> {
        let can_take = rep.max.is_none_or(|max| count < max);
        if count < rep.min {
            let again = Cont::Loop {
                rep,
                count: count + 1,
                entry: pos,
                next: k,
            };
            return self.match_node(&rep.inner, pos, &again);
        }
        if self.greedy {
            if can_take {
                let again = Cont::Loop {
                    rep,
                    count: count + 1,
                    entry: pos,
                    next: k,
                };
                if let Some(end) = self.match_node(&rep.inner, pos, &again) {
                    return Some(end);
                }
            }
            self.match_cont(k, pos)
        } else {
            if let Some(end) = self.match_cont(k, pos) {
                return Some(end);
            }
            if can_take {
                let again = Cont::Loop {
                    rep,
                    count: count + 1,
                    entry: pos,
                    next: k,
                };
                self.match_node(&rep.inner, pos, &again)
            } else {
                None
            }
        }
    }

    /// Match the text of group `n` at `pos`. A group that has not captured
    /// anything (yet) matches the empty string.
    fn match_backref(&mut self, n: usize, pos: usize, k: &Cont<'_>) -> Option<usize> {
        let span = match (self.starts.get(n - 1), self.ends.get(n - 1)) {
            (Some(&Some(start)), Some(&Some(end))) => CharSpan { start, end },
            _ => return self.match_cont(k, pos),
        };
        let len = span.len();
        if pos + len > self.subject.len() {
            return None;
        }
        let agrees = (0..len).all(|i| {
            char_eq(
                self.subject[span.start + i],
                self.subject[pos + i],
                self.fold,
            )
        });
        if agrees {
            self.match_cont(k, pos + len)
        } else {
            None
        }
    }

    fn at_word_boundary(&self, pos: usize) -> bool {
        let before = pos
            .checked_sub(1)
            .and_then(|i| self.subject.get(i))
            .is_some_and(|c| is_word(*c));
        let after = self.subject.get(pos).is_some_and(|c| is_word(*c));
        before != after
    }
}

fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn consumes_one_char(node: &Ast) -> bool {
    matches!(node, Ast::Literal(_) | Ast::AnyChar | Ast::Class(_))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::parse::parse;

    fn try_at(pattern: &str, subject: &str, start: usize) -> Option<(usize, Vec<Option<CharSpan>>)> {
        let parsed = parse(pattern).unwrap();
        let chars: Vec<char> = subject.chars().collect();
        let mut m = Matcher::new(&parsed.root, parsed.group_count, &chars, false, true);
        m.match_at(start)
            .map(|state| (state.end, state.captures))
    }

    #[test]
    fn test_match_is_anchored_at_offset() {
        assert_eq!(try_at("bc", "abc", 0), None);
        assert_eq!(try_at("bc", "abc", 1).map(|m| m.0), Some(3));
    }

    #[test]
    fn test_alternation_captures_untaken_branch_is_absent() {
        let (_, caps) = try_at("(a)|(b)", "b", 0).unwrap();
        assert_eq!(caps, vec![None, Some(CharSpan { start: 0, end: 1 })]);
    }

    #[test]
    fn test_repeat_keeps_last_iteration_capture() {
        let (end, caps) = try_at("(a|b)+", "ab", 0).unwrap();
        assert_eq!(end, 2);
        assert_eq!(caps, vec![Some(CharSpan { start: 1, end: 2 })]);
    }

    #[test]
    fn test_backref_backtracks_the_group() {
        // group must settle on "aa" so the backreference fits
        let (end, caps) = try_at("(a+)\\1", "aaaa", 0).unwrap();
        assert_eq!(end, 4);
        assert_eq!(caps, vec![Some(CharSpan { start: 0, end: 2 })]);
    }

    #[test]
    fn test_empty_loop_terminates() {
        let (end, _) = try_at("(a*)*", "b", 0).unwrap();
        assert_eq!(end, 0);
    }

    #[test]
    fn test_word_boundary() {
        assert!(try_at("\\bfoo\\b", "a foo b", 2).is_some());
        assert!(try_at("\\bfoo\\b", "afoob", 1).is_none());
        assert!(try_at("\\Boo", "foo", 1).is_some());
    }

    #[test]
    fn test_bounded_repeat() {
        assert_eq!(try_at("a{2,3}", "aaaa", 0).map(|m| m.0), Some(3));
        assert_eq!(try_at("a{2,3}", "a", 0), None);
        assert_eq!(try_at("a{0}", "zzz", 1).map(|m| m.0), Some(1));
    }

    #[test]
    fn test_long_runs_stay_below_the_depth_ceiling() {
        // pasted-text sized subjects must not deepen the stack per char
        let subject = "a".repeat(120_000);
        let (end, _) = try_at("a+", &subject, 0).unwrap();
        assert_eq!(end, 120_000);
        // backtracking the run end-to-end still terminates cleanly
        assert!(try_at("a+b", &subject, 0).is_none());
        let (end, _) = try_at("\\w*", &subject, 0).unwrap();
        assert_eq!(end, 120_000);
    }

    #[test]
    fn test_end_anchor() {
        assert_eq!(try_at("c$", "abc", 2).map(|m| m.0), Some(3));
        assert_eq!(try_at("b$", "abc", 1), None);
    }
}
