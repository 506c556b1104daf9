use thiserror::Error;

/// Canonical errors for the engine.
#[derive(Error, Debug)]
pub enum Error {
    /// The pattern text does not parse under the engine's grammar.
    ///
    /// Carries the parser's message (unbalanced group, invalid escape,
    /// invalid quantifier, ...). This is the only error a search pipeline
    /// can surface: `search` and template expansion are total once a
    /// `Pattern` exists.
    #[error("invalid pattern: {0}")]
    InvalidPattern(String),

    /// A span was constructed with `end < start`.
    #[error("invalid range: [{0}, {1})")]
    InvalidRange(usize, usize),
}

pub type Result<T> = std::result::Result<T, Error>;
