//! Sign-database error types with rich diagnostics.

use miette::Diagnostic;
use thiserror::Error;

/// Errors arising while building sign catalogs.
#[derive(Debug, Error, Diagnostic)]
pub enum SignError {
    #[error("malformed sign catalog {origin}: {message}")]
    #[diagnostic(
        code(mdc::signs::malformed_catalog),
        help(
            "The sign-description source could not be parsed. Each `[[sign]]` table \
             needs a unique, non-empty `code`; variant relations must be one of \
             full, partial, graphical, unspecified, and value levels one of \
             keyboard, palette, informative, mdc."
        )
    )]
    MalformedCatalog { origin: String, message: String },

    #[error("failed to read sign catalog {path}: {source}")]
    #[diagnostic(
        code(mdc::signs::io),
        help("Check that the file exists and is readable.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("distribution sign catalog not found: {path}")]
    #[diagnostic(
        code(mdc::signs::missing_distribution),
        help(
            "The distribution catalog is required. Point `distribution_file` at an \
             existing file, or remove the setting to use the built-in catalog."
        )
    )]
    MissingDistribution { path: String },
}

/// Result type for sign-database operations.
pub type SignResult<T> = std::result::Result<T, SignError>;
