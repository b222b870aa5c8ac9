//! Error types for custom_markdown_lint.
//!
//! [`ModuleError`] covers what can go wrong inside the module itself. The
//! [`Error`] type here wraps it together with the failures of the outer
//! binary: reading the arguments file and rendering output.

use crate::modules::ModuleError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for custom_markdown_lint operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for custom_markdown_lint.
#[derive(Error, Debug)]
pub enum Error {
    /// The arguments file could not be read.
    #[error("Failed to read module arguments from '{path}': {source}")]
    ArgsFile {
        /// Path given by the host
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// The arguments file is not a JSON object.
    #[error("Failed to parse module arguments: {0}")]
    ArgsParse(String),

    /// The binary was started without an arguments file.
    #[error(
        "No module arguments file given. This binary is an Ansible module and \
         expects the path of a JSON arguments file as its only argument"
    )]
    NoArgsFile,

    /// Error raised by the module.
    #[error(transparent)]
    Module(#[from] ModuleError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Creates a new arguments file error.
    pub fn args_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ArgsFile {
            path: path.into(),
            source,
        }
    }
}
