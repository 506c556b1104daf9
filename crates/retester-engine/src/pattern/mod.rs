//! Compiled patterns: parse once, match many times.

mod ast;
mod matcher;
mod parse;

use crate::error::Result;

/// Configuration options for pattern compilation.
///
/// This is the whole of the engine's configuration surface; there is no
/// process-wide state. The options are baked into the `Pattern`, so
/// changing either flag means recompiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineOpts {
    /// Exact-case comparison. `false` folds pattern and subject with the
    /// same simple one-to-one lowercase mapping.
    pub case_sensitive: bool,
    /// Maximal quantifiers. `false` flips **every** quantifier to its
    /// minimal form; there is no per-quantifier syntax for this.
    pub greedy: bool,
}

impl Default for EngineOpts {
    fn default() -> Self {
        Self {
            case_sensitive: true,
            greedy: true,
        }
    }
}

/// A compiled pattern plus the options it was compiled with.
///
/// Immutable after compilation; a search never mutates it, so one
/// `Pattern` can serve any number of scans (on any thread).
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    opts: EngineOpts,
    root: ast::Ast,
    group_count: usize,
}

impl Pattern {
    /// Compile `pattern_text` under `opts`.
    ///
    /// The empty pattern compiles and matches the empty string. Syntax
    /// errors come back as `Error::InvalidPattern` with the parser's
    /// message; nothing is retried or partially compiled.
    pub fn compile(pattern_text: &str, opts: EngineOpts) -> Result<Self> {
        let parsed = parse::parse(pattern_text)?;
        Ok(Self {
            source: pattern_text.to_owned(),
            opts,
            root: parsed.root,
            group_count: parsed.group_count,
        })
    }

    /// The pattern text this was compiled from.
    #[inline]
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The options this was compiled with.
    #[inline]
    #[must_use]
    pub fn opts(&self) -> EngineOpts {
        self.opts
    }

    /// Number of capturing groups (group 0 not included).
    #[inline]
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.group_count
    }

    /// A matcher over `subject`, reusable across scan offsets.
    pub(crate) fn matcher<'s, 'p>(&'p self, subject: &'s [char]) -> matcher::Matcher<'s, 'p> {
        matcher::Matcher::new(
            &self.root,
            self.group_count,
            subject,
            !self.opts.case_sensitive,
            self.opts.greedy,
        )
    }
}
