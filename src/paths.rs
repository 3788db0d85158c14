//! XDG-compliant path resolution for mdc-model.
//!
//! The user sign-definition file lives in the preferences directory,
//! `$XDG_CONFIG_HOME/mdc-model/signs_definition.toml`.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// File name of the user sign-definition catalog.
pub const USER_SIGNS_FILE: &str = "signs_definition.toml";

/// Errors from path resolution.
#[derive(Debug, Error, Diagnostic)]
pub enum PathError {
    #[error("cannot determine home directory")]
    #[diagnostic(
        code(mdc::paths::no_home),
        help("Set the HOME environment variable or pass --user-file explicitly.")
    )]
    NoHome,
}

pub type PathResult<T> = std::result::Result<T, PathError>;

/// Preference directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MdcPaths {
    /// `$XDG_CONFIG_HOME/mdc-model/`
    pub config_dir: PathBuf,
}

impl MdcPaths {
    /// Resolve XDG directories from environment variables with standard fallbacks.
    pub fn resolve() -> PathResult<Self> {
        let home = std::env::var("HOME")
            .map(PathBuf::from)
            .map_err(|_| PathError::NoHome)?;

        let config_dir = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| home.join(".config"))
            .join("mdc-model");

        Ok(Self { config_dir })
    }

    /// Path to the user sign-definition catalog.
    pub fn user_sign_definition_file(&self) -> PathBuf {
        self.config_dir.join(USER_SIGNS_FILE)
    }

    /// Path to the global config file.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }
}
