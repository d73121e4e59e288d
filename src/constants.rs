//! Common constants used throughout the Sprout application.

/// Template-local ignore file name
pub const IGNORE_FILE: &str = ".sproutignore";

/// Patterns that are never copied from a filesystem template.
pub const DEFAULT_IGNORE_PATTERNS: [&str; 6] = [
    "**/.DS_Store",
    "**/__pycache__",
    "**/__pycache__/**",
    "**/*.pyc",
    ".git",
    ".git/**",
];

/// Settings directory and file, relative to the platform config directory.
pub const CONFIG_DIR: &str = "sprout";
pub const CONFIG_FILE: &str = "config.yml";

/// Name of the generated license file.
pub const LICENSE_FILE: &str = "LICENSE.txt";

/// License choice that disables license generation.
pub const NO_LICENSE: &str = "None";

/// Directory removed from the template when tests are not wanted.
pub const TESTS_DIR: &str = "tests";

/// Package name answer that selects the standalone script layout.
pub const STANDALONE_PACKAGE: &str = "-";

/// Template directory holding the application package, and its entry point.
pub const PACKAGE_DIR: &str = "{{package_name}}";
pub const MAIN_FILE: &str = "main.py";

pub const INITIAL_COMMIT_MESSAGE: &str = "Initial Commit";

pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_VALIDATION_ERROR: i32 = 2;
pub const EXIT_IO_ERROR: i32 = 3;
pub const EXIT_VCS_ERROR: i32 = 4;
pub const EXIT_ABORTED: i32 = 5;
