//! Error handling for the Sprout application.
//! Defines the error taxonomy, the result alias, and the mapping from
//! error classes to process exit codes.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::constants::{
    EXIT_ABORTED, EXIT_FAILURE, EXIT_IO_ERROR, EXIT_VALIDATION_ERROR, EXIT_VCS_ERROR,
};

/// Custom error types for Sprout operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Filesystem failure outside of the copy step, such as reading settings.
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    /// The requested project location cannot be used.
    #[error("Invalid location '{location}': {reason}.")]
    InvalidLocation { location: String, reason: String },

    /// The target directory exists and already holds files.
    #[error("The directory '{output_dir}' is not empty. Please specify a different location.")]
    OutputDirectoryNotEmpty { output_dir: String },

    /// A placeholder in a template path rendered into something that is not a
    /// single path component.
    #[error("Template path '{template_path}' renders to invalid name '{rendered}'.")]
    InvalidRenderedPath { template_path: String, rendered: String },

    /// Two template entries resolve to the same destination.
    #[error("Template paths '{first}' and '{second}' both resolve to '{target}'.")]
    PathCollision { first: String, second: String, target: String },

    /// Writing the generated project failed part way through.
    #[error("Failed to write '{}': {source}. Remove the directory and try again.", path.display())]
    WriteError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Represents errors while reading a template directory.
    #[error("Template error: {0}.")]
    TemplateError(String),

    /// Represents errors that occur during configuration parsing or processing.
    #[error("Configuration error: {0}.")]
    ConfigError(String),

    /// Represents errors in processing .sproutignore files.
    #[error("SproutIgnore error: {0}.")]
    SproutIgnoreError(String),

    /// Represents validation failures in user input
    #[error("Validation error: {0}.")]
    ValidationError(String),

    /// Unsupported license name.
    #[error("Unknown license '{name}' (available: {available}).")]
    UnknownLicense { name: String, available: String },

    /// The user declined to continue.
    #[error("Aborted by user.")]
    Aborted,

    /// Errors raised by the interactive prompt.
    #[error("Prompt error: {0}.")]
    PromptError(#[from] dialoguer::Error),
}

impl Error {
    /// Process exit code for this error class.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidLocation { .. }
            | Error::OutputDirectoryNotEmpty { .. }
            | Error::InvalidRenderedPath { .. }
            | Error::PathCollision { .. }
            | Error::ValidationError(_)
            | Error::UnknownLicense { .. } => EXIT_VALIDATION_ERROR,
            Error::WriteError { .. } => EXIT_IO_ERROR,
            Error::Aborted => EXIT_ABORTED,
            _ => EXIT_FAILURE,
        }
    }
}

/// Failures of the external version-control step.
///
/// These never fail project creation: the generated files stay on disk and the
/// error is reported as a warning.
#[derive(Error, Debug)]
pub enum VcsError {
    #[error("git executable not found in PATH")]
    Unavailable,

    #[error("'git {command}' could not be started: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("'git {command}' exited with {status}: {stderr}")]
    CommandFailed { command: String, status: String, stderr: String },
}

impl VcsError {
    pub fn exit_code(&self) -> i32 {
        EXIT_VCS_ERROR
    }
}

/// Convenience type alias for Results with Error as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Behavior
/// Prints the error message to stderr and exits with the error's exit code.
pub fn default_error_handler(err: Error) -> ! {
    eprintln!("Error: {err}");
    std::process::exit(err.exit_code());
}
