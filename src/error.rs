//! Rich diagnostic error types for mdc-model.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives.
//! [`MdcError`] wraps them so the CLI can report any of them with its code and help.

use miette::Diagnostic;
use thiserror::Error;

use crate::config::ConfigError;
use crate::mdc::ModelError;
use crate::paths::PathError;
use crate::signs::SignError;

/// Top-level error type.
#[derive(Debug, Error, Diagnostic)]
pub enum MdcError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Sign(#[from] SignError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Path(#[from] PathError),
}

/// Convenience result type.
pub type MdcResult<T> = std::result::Result<T, MdcError>;
