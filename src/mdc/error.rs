//! Document-model error types with rich diagnostics.

use miette::Diagnostic;
use thiserror::Error;

/// Errors from modifier queries and top-item list edits.
#[derive(Debug, Error, Diagnostic)]
pub enum ModelError {
    #[error("no integer modifier named \"{name}\"")]
    #[diagnostic(
        code(mdc::model::no_such_modifier),
        help(
            "The sign carries no integer modifier with this name. Use \
             `integer_or(name, default)` when absence is expected."
        )
    )]
    NoSuchModifier { name: String },

    #[error("position {index} is out of bounds for a list of {len} items")]
    #[diagnostic(
        code(mdc::model::out_of_bounds),
        help("Positions fall between items and range from 0 to the list length.")
    )]
    OutOfBounds { index: usize, len: usize },

    #[error("invalid modifier \"{token}\": {message}")]
    #[diagnostic(
        code(mdc::model::invalid_modifier),
        help(
            "Modifiers are written as an optional backslash, a name made of letters, \
             and an optional integer: `\\`, `\\120`, `r1`, `R45`, `s2`, `red`."
        )
    )]
    InvalidModifier { token: String, message: String },
}

/// Result type for document-model operations.
pub type ModelResult<T> = std::result::Result<T, ModelError>;
