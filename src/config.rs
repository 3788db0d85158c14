//! Sign-database configuration, persisted as TOML.
//!
//! ```toml
//! # distribution_file = "/usr/share/mdc/signs_description.toml"
//! user_file = "/home/me/.config/mdc-model/signs_definition.toml"
//! load_user_file = true
//! ```

use std::path::{Path, PathBuf};

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::paths::MdcPaths;

/// Errors from configuration loading.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config: {path}")]
    #[diagnostic(
        code(mdc::config::read),
        help("Ensure the config file exists and is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {message}")]
    #[diagnostic(
        code(mdc::config::parse),
        help("Check the TOML syntax. Known keys: distribution_file, user_file, load_user_file.")
    )]
    Parse { path: String, message: String },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Where the two sign catalogs come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Distribution catalog. `None` uses the catalog built into the crate.
    #[serde(default)]
    pub distribution_file: Option<PathBuf>,
    /// User catalog. `None` uses the preferences directory.
    #[serde(default)]
    pub user_file: Option<PathBuf>,
    /// Skip the user layer entirely when false.
    #[serde(default = "default_load_user_file")]
    pub load_user_file: bool,
}

fn default_load_user_file() -> bool {
    true
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            distribution_file: None,
            user_file: None,
            load_user_file: default_load_user_file(),
        }
    }
}

impl DatabaseConfig {
    /// Load from a TOML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::parse(&path.display().to_string(), &content)
    }

    /// Parse TOML text; `origin` names the source in errors.
    pub fn parse(origin: &str, content: &str) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: origin.to_string(),
            message: e.to_string(),
        })
    }

    /// The user catalog path to read, if any.
    ///
    /// An explicit `user_file` wins; otherwise the preferences directory is
    /// used when it can be resolved.
    pub fn resolve_user_file(&self, paths: Option<&MdcPaths>) -> Option<PathBuf> {
        if !self.load_user_file {
            return None;
        }
        self.user_file
            .clone()
            .or_else(|| paths.map(MdcPaths::user_sign_definition_file))
    }
}
