//! File and directory ignore pattern handling for Sprout templates.
//! This module processes .sproutignore files to exclude specific paths
//! of a filesystem template from generation, similar to .gitignore.

use crate::constants::{DEFAULT_IGNORE_PATTERNS, IGNORE_FILE};
use crate::error::{Error, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use log::debug;
use std::{fs::read_to_string, path::Path};

/// Reads the .sproutignore file of a template directory and compiles it,
/// together with the built-in patterns, into a set of globs.
///
/// # Arguments
/// * `template_dir` - Root of the template
///
/// # Returns
/// * `Result<GlobSet>` - Set of compiled glob patterns for path matching
///
/// # Notes
/// - If the .sproutignore file doesn't exist, only the built-in patterns apply
/// - Blank lines and lines starting with `#` are skipped
/// - Invalid patterns result in a SproutIgnoreError
///
/// # Example
/// ```ignore
/// # Contents of .sproutignore:
/// *.pyc
/// .venv/**
/// ```
pub fn parse_sproutignore_file<P: AsRef<Path>>(template_dir: P) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();

    for pattern in DEFAULT_IGNORE_PATTERNS {
        builder.add(compile(pattern)?);
    }

    let ignore_path = template_dir.as_ref().join(IGNORE_FILE);
    if let Ok(contents) = read_to_string(&ignore_path) {
        for line in contents.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            builder.add(compile(line)?);
        }
    } else {
        debug!("{} does not exist", ignore_path.display());
    }

    builder
        .build()
        .map_err(|e| Error::SproutIgnoreError(format!("{IGNORE_FILE} loading failed: {e}")))
}

fn compile(pattern: &str) -> Result<Glob> {
    // A trailing slash marks a directory; match the directory itself.
    let pattern = pattern.trim_end_matches('/');
    Glob::new(pattern)
        .map_err(|e| Error::SproutIgnoreError(format!("{IGNORE_FILE} loading failed: {e}")))
}
