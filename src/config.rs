//! User settings for Sprout.
//! Settings live in a YAML file under the platform configuration directory
//! and provide the defaults for every new project.

use crate::constants::{CONFIG_DIR, CONFIG_FILE, NO_LICENSE};
use crate::error::{Error, Result};
use crate::license::{DEFAULT_LICENSE, LICENSE_NAMES};
use crate::prompt::Prompter;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Persisted defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub author_name: String,
    pub author_email: String,
    pub default_license: String,
    /// Start every project from the bundled template.
    pub use_default_template: bool,
    /// Extra template directory overlaid on the bundled one.
    pub template_folder: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            author_name: String::new(),
            author_email: String::new(),
            default_license: DEFAULT_LICENSE.to_string(),
            use_default_template: true,
            template_folder: None,
        }
    }
}

impl Settings {
    /// Display rows for `config show`, in file order.
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("author_name", self.author_name.clone()),
            ("author_email", self.author_email.clone()),
            ("default_license", self.default_license.clone()),
            ("use_default_template", self.use_default_template.to_string()),
            (
                "template_folder",
                self.template_folder
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
            ),
        ]
    }
}

/// Default location of the settings file, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
}

/// Loads settings from `path`. A missing file yields the defaults.
///
/// # Arguments
/// * `path` - Location of the YAML settings file
///
/// # Returns
/// * `Result<Settings>` - Parsed settings; absent fields take their defaults
///
/// # Errors
/// * `Error::IoError` if the file exists but cannot be read
/// * `Error::ConfigError` if the file exists but is not valid YAML
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();
    if !path.exists() {
        debug!("No settings at {}, using defaults", path.display());
        return Ok(Settings::default());
    }
    debug!("Loading settings from {}", path.display());
    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(Settings::default());
    }
    serde_yaml::from_str(&content).map_err(|e| {
        Error::ConfigError(format!("Invalid settings file '{}': {}", path.display(), e))
    })
}

/// Writes settings to `path`, creating its directory.
///
/// # Errors
/// * `Error::IoError` if the directory or file cannot be written
/// * `Error::ConfigError` if the settings cannot be serialized
pub fn save_settings<P: AsRef<Path>>(path: P, settings: &Settings) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = serde_yaml::to_string(settings)
        .map_err(|e| Error::ConfigError(format!("Cannot serialize settings: {e}")))?;
    fs::write(path, content)?;
    debug!("Saved settings to {}", path.display());
    Ok(())
}

/// Asks for every setting, offering the current values as defaults.
pub fn change_settings(prompt: &dyn Prompter, current: Settings) -> Result<Settings> {
    let author_name = prompt.text("Author Name?", &current.author_name)?;
    let author_email = prompt.text("Author Email?", &current.author_email)?;
    let start = LICENSE_NAMES.iter().position(|l| *l == current.default_license).unwrap_or(0);
    let index = prompt.select("Default License?", &LICENSE_NAMES, start)?;
    let default_license = LICENSE_NAMES.get(index).copied().unwrap_or(NO_LICENSE).to_string();
    let use_default_template = prompt.confirm(
        false,
        "Use the bundled template as the base for new projects?",
        current.use_default_template,
    )?;
    let folder = current
        .template_folder
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    let folder = prompt.text("Custom template folder? (empty for none)", &folder)?;
    let template_folder = (!folder.trim().is_empty()).then(|| PathBuf::from(folder.trim()));

    Ok(Settings {
        author_name,
        author_email,
        default_license,
        use_default_template,
        template_folder,
    })
}
