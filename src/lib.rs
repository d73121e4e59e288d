//! Sprout bootstraps new Python applications from a bundled template.
//! It copies the template tree with placeholder substitution, writes a
//! license file and records everything in a fresh git repository.

/// Command-line interface module for the Sprout application
pub mod cli;

/// Subprocess execution with structured results
pub mod command;

/// User settings stored in the platform configuration directory
pub mod config;

/// Common constants
pub mod constants;

/// Template context: token names and their values
pub mod context;

/// Error types and handling for the Sprout application
pub mod error;

/// File and directory ignore patterns
/// Processes .sproutignore files to exclude specific paths
pub mod ignore;

/// Bundled license texts
pub mod license;

/// Loading templates from the binary and from disk
pub mod loader;

/// Template materialization into the project directory
pub mod processor;

/// Project creation orchestration
pub mod project;

/// User input and interaction handling
pub mod prompt;

/// Placeholder substitution
pub mod renderer;

/// In-memory template tree
pub mod tree;

/// Git repository initialization
pub mod vcs;
