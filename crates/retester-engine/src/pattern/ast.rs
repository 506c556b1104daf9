//! Syntax tree for compiled patterns.
//!
//! The parser lowers pattern text into this tree; the matcher walks it
//! directly. Greediness is deliberately absent from `Repeat`: the engine
//! applies a single global greedy/minimal mode from `EngineOpts`.

/// A parsed pattern node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Ast {
    /// Matches the empty string (empty pattern, empty alternation branch).
    Empty,
    /// A single literal char.
    Literal(char),
    /// `.` — any char except `\n`.
    AnyChar,
    /// `[...]` / `[^...]`, and bare Perl classes like `\d`.
    Class(CharClass),
    /// `^` — subject start.
    StartAnchor,
    /// `$` — subject end.
    EndAnchor,
    /// `\b` (negated: `\B`) — word/non-word boundary.
    WordBoundary { negated: bool },
    /// `\N` — the text most recently captured by group N (1-based).
    Backref(usize),
    /// A group. `index` is `None` for `(?:...)`.
    Group { index: Option<usize>, inner: Box<Ast> },
    /// Nodes matched one after another.
    Concat(Vec<Ast>),
    /// `a|b|...` — branches tried left to right.
    Alternate(Vec<Ast>),
    /// A quantified node.
    Repeat(Repeat),
}

/// Repetition bounds for `*`, `+`, `?` and `{m,n}`.
///
/// `max == None` means unbounded. Invariant: `min <= max` when bounded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Repeat {
    pub(crate) inner: Box<Ast>,
    pub(crate) min: u32,
    pub(crate) max: Option<u32>,
}

/// One member of a bracketed class.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ClassItem {
    /// A single char.
    Char(char),
    /// An inclusive range `a-z`. Invariant: `lo <= hi`.
    Range(char, char),
    /// A Perl class (`\d`, `\W`, ...), negation included.
    Perl(PerlClass),
}

/// `\d` digits, `\w` word chars, `\s` whitespace; uppercase negates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PerlClass {
    pub(crate) kind: PerlKind,
    pub(crate) negated: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PerlKind {
    Digit,
    Word,
    Space,
}

impl PerlClass {
    pub(crate) fn matches(self, c: char) -> bool {
        let hit = match self.kind {
            PerlKind::Digit => c.is_ascii_digit(),
            PerlKind::Word => c.is_alphanumeric() || c == '_',
            PerlKind::Space => c.is_whitespace(),
        };
        hit != self.negated
    }
}

/// A bracketed character class, or a bare Perl class lifted to one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct CharClass {
    pub(crate) items: Vec<ClassItem>,
    pub(crate) negated: bool,
}

impl CharClass {
    /// Wrap a single Perl class (`\d` outside brackets parses to this).
    pub(crate) fn perl(kind: PerlKind, negated: bool) -> Self {
        CharClass {
            items: vec![ClassItem::Perl(PerlClass { kind, negated })],
            negated: false,
        }
    }

    /// Membership test. `fold` enables the engine's case-insensitive mode:
    /// the probe char is additionally tried lowercased and uppercased so
    /// that `[a-z]` accepts `A` and `[A-Z]` accepts `a`.
    pub(crate) fn matches(&self, c: char, fold: bool) -> bool {
        let mut hit = self.items.iter().any(|it| it.matches(c));
        if !hit && fold {
            hit = fold_variants(c).into_iter().flatten().any(|v| {
                v != c && self.items.iter().any(|it| it.matches(v))
            });
        }
        hit != self.negated
    }
}

impl ClassItem {
    fn matches(self, c: char) -> bool {
        match self {
            ClassItem::Char(x) => x == c,
            ClassItem::Range(lo, hi) => lo <= c && c <= hi,
            ClassItem::Perl(p) => p.matches(c),
        }
    }
}

/// Simple one-to-one case folding: the single-char lowercase mapping when
/// one exists, otherwise the char itself. Multi-char expansions (ß → "ss")
/// are left alone so folding never changes text length.
pub(crate) fn fold_char(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}

/// Case-insensitive variants of `c` to probe against a class: lowercase and
/// uppercase single-char mappings, when they exist.
fn fold_variants(c: char) -> [Option<char>; 2] {
    let mut lower = c.to_lowercase();
    let low = match (lower.next(), lower.next()) {
        (Some(l), None) => Some(l),
        _ => None,
    };
    let mut upper = c.to_uppercase();
    let up = match (upper.next(), upper.next()) {
        (Some(u), None) => Some(u),
        _ => None,
    };
    [low, up]
}

/// Char equality under the engine's folding mode.
pub(crate) fn char_eq(a: char, b: char, fold: bool) -> bool {
    if a == b {
        return true;
    }
    fold && fold_char(a) == fold_char(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perl_classes() {
        let digit = PerlClass { kind: PerlKind::Digit, negated: false };
        assert!(digit.matches('7'));
        assert!(!digit.matches('x'));

        let non_word = PerlClass { kind: PerlKind::Word, negated: true };
        assert!(non_word.matches(' '));
        assert!(!non_word.matches('_'));
    }

    #[test]
    fn test_class_fold() {
        let cls = CharClass {
            items: vec![ClassItem::Range('a', 'z')],
            negated: false,
        };
        assert!(cls.matches('q', false));
        assert!(!cls.matches('Q', false));
        assert!(cls.matches('Q', true));

        let neg = CharClass {
            items: vec![ClassItem::Char('x')],
            negated: true,
        };
        assert!(neg.matches('y', false));
        assert!(!neg.matches('X', true));
    }

    #[test]
    fn test_char_eq_fold() {
        assert!(char_eq('a', 'a', false));
        assert!(!char_eq('a', 'A', false));
        assert!(char_eq('a', 'A', true));
        assert!(char_eq('Ä', 'ä', true));
    }
}
