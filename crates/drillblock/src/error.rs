//! Error types for drillblock.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading settings or applying parameter edits.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Settings file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// File that was being read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Settings file is not valid TOML for [`crate::Settings`].
    #[error("invalid settings: {0}")]
    Toml(#[from] toml::de::Error),

    /// Parameter edit is not of the form `key=value`.
    #[error("malformed edit '{0}' (expected key=value)")]
    MalformedEdit(String),

    /// Parameter edit names a field that does not exist.
    #[error("unknown parameter '{0}'")]
    UnknownParameter(String),
}

/// Errors raised by mesh and script export.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Nothing to export.
    #[error("scene is empty")]
    EmptyScene,

    /// Writing the output file failed.
    #[error("failed to write {path}: {source}")]
    Write {
        /// Destination file.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
}

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;
