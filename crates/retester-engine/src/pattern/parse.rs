//! parse.rs — recursive-descent parser for the pattern grammar.
//!
//! Grammar (standard regexp dialect, one pass, no lookahead beyond a char):
//!   alternation := concat ('|' concat)*
//!   concat      := quantified*
//!   quantified  := atom ('*' | '+' | '?' | '{' bounds '}')?
//!   atom        := literal | '.' | '^' | '$' | escape | class | group
//!
//! Greediness is not part of the syntax: a quantifier directly following
//! another quantifier (`a*?`, `a{2}{3}`) is rejected, since the engine's
//! greedy/minimal mode is a single global option.

use crate::error::{Error, Result};

use super::ast::{Ast, CharClass, ClassItem, PerlClass, PerlKind, Repeat};

/// Largest accepted `{m,n}` bound.
const REPEAT_LIMIT: u32 = 65_535;

/// Parse output: the tree plus the number of capturing groups seen.
#[derive(Debug)]
pub(crate) struct ParsedPattern {
    pub(crate) root: Ast,
    pub(crate) group_count: usize,
}

/// Parse `pattern` or fail with `InvalidPattern`.
pub(crate) fn parse(pattern: &str) -> Result<ParsedPattern> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut p = Parser {
        chars: &chars,
        pos: 0,
        groups: 0,
        max_backref: 0,
    };
    let root = p.parse_alternation()?;
    if p.pos < p.chars.len() {
        // parse_alternation only stops early on ')'
        return Err(p.err("unbalanced group: unmatched ')'"));
    }
    if p.max_backref > p.groups {
        return Err(Error::InvalidPattern(format!(
            "backreference to nonexistent group {}",
            p.max_backref
        )));
    }
    Ok(ParsedPattern {
        root,
        group_count: p.groups,
    })
}

struct Parser<'a> {
    chars: &'a [char],
    pos: usize,
    groups: usize,
    /// Highest `\N` seen; validated against `groups` once parsing is done,
    /// so `\1(a)` is accepted but `(a)\2` is not.
    max_backref: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.pos + ahead).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn err(&self, msg: &str) -> Error {
        Error::InvalidPattern(format!("{msg} (near offset {})", self.pos))
    }

    fn parse_alternation(&mut self) -> Result<Ast> {
        let mut branches = vec![self.parse_concat()?];
        while self.peek() == Some('|') {
            self.bump();
            branches.push(self.parse_concat()?);
        }
        Ok(if branches.len() == 1 {
            branches.swap_remove(0)
        } else {
            Ast::Alternate(branches)
        })
    }

    fn parse_concat(&mut self) -> Result<Ast> {
        let mut nodes = Vec::new();
        loop {
            match self.peek() {
                None | Some(')') | Some('|') => break,
                Some('*') | Some('+') | Some('?') | Some('{') => {
                    return Err(self.err("dangling quantifier"));
                }
                _ => {}
            }
            let atom = self.parse_atom()?;
            nodes.push(self.maybe_quantify(atom)?);
        }
        Ok(match nodes.len() {
            0 => Ast::Empty,
            1 => nodes.swap_remove(0),
            _ => Ast::Concat(nodes),
        })
    }

    fn maybe_quantify(&mut self, atom: Ast) -> Result<Ast> {
        let (min, max) = match self.peek() {
            Some('*') => {
                self.bump();
                (0, None)
            }
            Some('+') => {
                self.bump();
                (1, None)
            }
            Some('?') => {
                self.bump();
                (0, Some(1))
            }
            Some('{') => {
                self.bump();
                self.parse_bounds()?
            }
            _ => return Ok(atom),
        };
        if matches!(
            atom,
            Ast::StartAnchor | Ast::EndAnchor | Ast::WordBoundary { .. }
        ) {
            return Err(self.err("invalid quantifier: cannot repeat an anchor"));
        }
        if matches!(self.peek(), Some('*' | '+' | '?' | '{')) {
            return Err(self.err("invalid quantifier: quantifier follows a quantifier"));
        }
        Ok(Ast::Repeat(Repeat {
            inner: Box::new(atom),
            min,
            max,
        }))
    }

    /// `{m}`, `{m,}` or `{m,n}`; the opening `{` is already consumed.
    fn parse_bounds(&mut self) -> Result<(u32, Option<u32>)> {
        let min = self.parse_bound_number()?;
        let max = match self.peek() {
            Some('}') => Some(min),
            Some(',') => {
                self.bump();
                if self.peek() == Some('}') {
                    None
                } else {
                    Some(self.parse_bound_number()?)
                }
            }
            _ => return Err(self.err("invalid quantifier")),
        };
        if self.bump() != Some('}') {
            return Err(self.err("invalid quantifier: missing '}'"));
        }
        if let Some(mx) = max {
            if min > mx {
                return Err(self.err("invalid quantifier: reversed bounds"));
            }
        }
        Ok((min, max))
    }

    fn parse_bound_number(&mut self) -> Result<u32> {
        let mut seen = false;
        let mut n: u32 = 0;
        while let Some(d) = self.peek().and_then(|c| c.to_digit(10)) {
            self.bump();
            seen = true;
            n = n.saturating_mul(10).saturating_add(d);
            if n > REPEAT_LIMIT {
                return Err(self.err("invalid quantifier: bound too large"));
            }
        }
        if !seen {
            return Err(self.err("invalid quantifier: expected a number"));
        }
        Ok(n)
    }

    fn parse_atom(&mut self) -> Result<Ast> {
        // the caller guarantees this is not EOF, ')', '|' or a quantifier
        let Some(c) = self.bump() else {
            return Err(self.err("unexpected end of pattern"));
        };
        Ok(match c {
            '(' => self.parse_group()?,
            '[' => self.parse_class()?,
            '.' => Ast::AnyChar,
            '^' => Ast::StartAnchor,
            '$' => Ast::EndAnchor,
            '\\' => self.parse_escape()?,
            c => Ast::Literal(c),
        })
    }

    /// A `(...)` or `(?:...)` group; the `(` is already consumed.
    fn parse_group(&mut self) -> Result<Ast> {
        let index = if self.peek() == Some('?') {
            self.bump();
            if self.bump() != Some(':') {
                return Err(self.err("unsupported group syntax"));
            }
            None
        } else {
            self.groups += 1;
            Some(self.groups)
        };
        let inner = self.parse_alternation()?;
        if self.bump() != Some(')') {
            return Err(self.err("unbalanced group: missing ')'"));
        }
        Ok(Ast::Group {
            index,
            inner: Box::new(inner),
        })
    }

    /// An escape outside a class; the `\` is already consumed.
    fn parse_escape(&mut self) -> Result<Ast> {
        let Some(c) = self.bump() else {
            return Err(self.err("dangling backslash"));
        };
        Ok(match c {
            'd' => Ast::Class(CharClass::perl(PerlKind::Digit, false)),
            'D' => Ast::Class(CharClass::perl(PerlKind::Digit, true)),
            'w' => Ast::Class(CharClass::perl(PerlKind::Word, false)),
            'W' => Ast::Class(CharClass::perl(PerlKind::Word, true)),
            's' => Ast::Class(CharClass::perl(PerlKind::Space, false)),
            'S' => Ast::Class(CharClass::perl(PerlKind::Space, true)),
            'b' => Ast::WordBoundary { negated: false },
            'B' => Ast::WordBoundary { negated: true },
            'n' => Ast::Literal('\n'),
            't' => Ast::Literal('\t'),
            'r' => Ast::Literal('\r'),
            'f' => Ast::Literal('\x0c'),
            'v' => Ast::Literal('\x0b'),
            c @ '0'..='9' => {
                let mut n = (c as usize) - ('0' as usize);
                while let Some(d) = self.peek().and_then(|c| c.to_digit(10)) {
                    self.bump();
                    n = n.saturating_mul(10).saturating_add(d as usize);
                    if n > REPEAT_LIMIT as usize {
                        return Err(self.err("invalid backreference"));
                    }
                }
                if n == 0 {
                    return Err(self.err("invalid backreference '\\0'"));
                }
                self.max_backref = self.max_backref.max(n);
                Ast::Backref(n)
            }
            c if c.is_alphanumeric() => {
                return Err(Error::InvalidPattern(format!("invalid escape '\\{c}'")));
            }
            c => Ast::Literal(c),
        })
    }

    /// A `[...]` class; the `[` is already consumed.
    fn parse_class(&mut self) -> Result<Ast> {
        let negated = if self.peek() == Some('^') {
            self.bump();
            true
        } else {
            false
        };
        let mut items = Vec::new();
        let mut first = true;
        loop {
            let Some(c) = self.bump() else {
                return Err(self.err("unclosed character class"));
            };
            let item = match c {
                // first ']' after '[' or '[^' is a literal
                ']' if !first => {
                    return Ok(Ast::Class(CharClass { items, negated }));
                }
                ']' => ClassItem::Char(']'),
                '\\' => self.parse_class_escape()?,
                c => ClassItem::Char(c),
            };
            first = false;
            items.push(self.maybe_range(item)?);
        }
    }

    /// Extend a plain char into a range when followed by `-x` (but `-]` is
    /// a literal dash).
    fn maybe_range(&mut self, item: ClassItem) -> Result<ClassItem> {
        let ClassItem::Char(lo) = item else {
            return Ok(item);
        };
        if self.peek() != Some('-') || !self.peek_at(1).is_some_and(|c| c != ']') {
            return Ok(item);
        }
        self.bump(); // '-'
        let hi = match self.bump() {
            Some('\\') => match self.parse_class_escape()? {
                ClassItem::Char(h) => h,
                _ => return Err(self.err("invalid character range")),
            },
            Some(h) => h,
            None => return Err(self.err("unclosed character class")),
        };
        if lo > hi {
            return Err(self.err("invalid character range"));
        }
        Ok(ClassItem::Range(lo, hi))
    }

    /// An escape inside a class; the `\` is already consumed.
    fn parse_class_escape(&mut self) -> Result<ClassItem> {
        let Some(c) = self.bump() else {
            return Err(self.err("unclosed character class"));
        };
        Ok(match c {
            'd' => ClassItem::Perl(PerlClass { kind: PerlKind::Digit, negated: false }),
            'D' => ClassItem::Perl(PerlClass { kind: PerlKind::Digit, negated: true }),
            'w' => ClassItem::Perl(PerlClass { kind: PerlKind::Word, negated: false }),
            'W' => ClassItem::Perl(PerlClass { kind: PerlKind::Word, negated: true }),
            's' => ClassItem::Perl(PerlClass { kind: PerlKind::Space, negated: false }),
            'S' => ClassItem::Perl(PerlClass { kind: PerlKind::Space, negated: true }),
            'n' => ClassItem::Char('\n'),
            't' => ClassItem::Char('\t'),
            'r' => ClassItem::Char('\r'),
            'f' => ClassItem::Char('\x0c'),
            'v' => ClassItem::Char('\x0b'),
            c if c.is_alphanumeric() => {
                return Err(Error::InvalidPattern(format!(
                    "invalid escape '\\{c}' in character class"
                )));
            }
            c => ClassItem::Char(c),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(pattern: &str) -> ParsedPattern {
        parse(pattern).unwrap()
    }

    fn fails(pattern: &str) -> String {
        match parse(pattern) {
            Err(Error::InvalidPattern(msg)) => msg,
            other => panic!("expected InvalidPattern for {pattern:?}, got {other:?}"),
        }
    }

    #[test]
    fn test_group_counting() {
        assert_eq!(ok("abc").group_count, 0);
        assert_eq!(ok("(a)(b)").group_count, 2);
        assert_eq!(ok("((a)b)").group_count, 2);
        assert_eq!(ok("(?:a)(b)").group_count, 1);
    }

    #[test]
    fn test_empty_and_empty_branches() {
        assert_eq!(ok("").root, Ast::Empty);
        let parsed = ok("a|");
        assert!(matches!(parsed.root, Ast::Alternate(ref b) if b.len() == 2 && b[1] == Ast::Empty));
    }

    #[test]
    fn test_quantifier_shapes() {
        let parsed = ok("a{2,5}");
        match parsed.root {
            Ast::Repeat(Repeat { min, max, .. }) => {
                assert_eq!(min, 2);
                assert_eq!(max, Some(5));
            }
            other => panic!("unexpected tree: {other:?}"),
        }
        match ok("a{3,}").root {
            Ast::Repeat(Repeat { min, max, .. }) => {
                assert_eq!(min, 3);
                assert_eq!(max, None);
            }
            other => panic!("unexpected tree: {other:?}"),
        }
        match ok("a{4}").root {
            Ast::Repeat(Repeat { min, max, .. }) => {
                assert_eq!(min, 4);
                assert_eq!(max, Some(4));
            }
            other => panic!("unexpected tree: {other:?}"),
        }
    }

    #[test]
    fn test_unbalanced_groups() {
        assert!(fails("(").contains("unbalanced"));
        assert!(fails("(a").contains("unbalanced"));
        assert!(fails("a)").contains("unbalanced"));
        assert!(fails("a(b))").contains("unbalanced"));
    }

    #[test]
    fn test_invalid_quantifiers() {
        fails("*a");
        fails("a**");
        fails("a*?");
        fails("a{2}{3}");
        fails("a{,3}");
        fails("a{3,1}");
        fails("a{70000}");
        fails("^*");
    }

    #[test]
    fn test_invalid_escapes() {
        assert!(fails("\\q").contains("invalid escape"));
        assert!(fails("[\\q]").contains("character class"));
        fails("a\\");
    }

    #[test]
    fn test_class_edge_cases() {
        // first ']' is literal, trailing '-' is literal
        assert!(parse("[]a]").is_ok());
        assert!(parse("[a-]").is_ok());
        assert!(parse("[-a]").is_ok());
        assert!(parse("[a-z\\d]").is_ok());
        // a dash after a class escape is a literal dash
        assert!(parse("[\\d-z]").is_ok());
        fails("[abc");
        assert!(fails("[z-a]").contains("range"));
    }

    #[test]
    fn test_backref_validation() {
        assert!(parse("(a)\\1").is_ok());
        // groups are counted over the whole pattern, position does not matter
        assert!(parse("\\1(a)").is_ok());
        assert!(fails("(a)\\2").contains("nonexistent"));
        fails("\\0");
    }

    #[test]
    fn test_unsupported_group_syntax() {
        assert!(fails("(?P<x>a)").contains("unsupported"));
        assert!(parse("(?:a|b)c").is_ok());
    }
}
