//! Error handling for the enginex scaffolding library.
//!
//! This module defines the main error type `Error` used throughout the library,
//! along with a convenient `Result` type alias. Every variant except the ones
//! raised by external processes is fatal: the pipeline aborts on the first one
//! and leaves already written files in place.
//!
//! # Examples
//!
//! ```
//! use enginex::core::error::{Error, Result};
//!
//! fn might_fail() -> Result<()> {
//!     Err(Error::config("no backends configured"))
//! }
//!
//! assert!(might_fail().is_err());
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Result type for enginex operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for enginex operations
#[derive(Debug, Error)]
pub enum Error {
    /// The requested template (file or directory) does not exist in the template source
    #[error("Template not found: {template}")]
    TemplateNotFound { template: String },

    /// A file or directory in the destination tree could not be written
    #[error("Failed to write {}: {source}", path.display())]
    FilesystemWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No line of the patched file matches the anchor
    #[error("Anchor '{anchor}' not found in {}", path.display())]
    AnchorNotFound { path: PathBuf, anchor: String },

    /// A non-forced materialization would replace a file with different content
    #[error("Refusing to overwrite {} without force", path.display())]
    Conflict { path: PathBuf },

    /// Template engine error
    #[error("Template rendering error: {0}")]
    Render(#[from] tera::Error),

    /// An external command could not be started
    #[error("Failed to execute command '{command}': {source}")]
    Command {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The external project generator exited unsuccessfully
    #[error("Project generator '{command}' exited with status {exit_code}: {stderr}")]
    ExternalGenerator {
        command: String,
        exit_code: i32,
        stderr: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A pipeline step failed
    #[error("STEP {ordinal} ({label}) failed for {}: {source}", destination.display())]
    Step {
        ordinal: usize,
        label: String,
        destination: PathBuf,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new template-not-found error
    pub fn template_not_found<S: Into<String>>(template: S) -> Self {
        Self::TemplateNotFound {
            template: template.into(),
        }
    }

    /// Wrap an IO error with the destination path that could not be written
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FilesystemWrite {
            path: path.into(),
            source,
        }
    }

    /// The innermost error, looking through step wrappers
    pub fn root_cause(&self) -> &Error {
        match self {
            Self::Step { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
