//! Template loading for Sprout.
//! Reads the bundled template and optional filesystem templates into an
//! in-memory [`Node`] tree.
use crate::constants::IGNORE_FILE;
use crate::error::{Error, Result};
use crate::ignore::parse_sproutignore_file;
use crate::tree::Node;
use log::debug;
use rust_embed::RustEmbed;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Python application template compiled into the binary.
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/template/"]
struct BundledAssets;

/// Represents the source location of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// The template shipped inside the binary
    Bundled,
    /// Local filesystem template path
    FileSystem(PathBuf),
}

impl std::fmt::Display for TemplateSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemplateSource::Bundled => write!(f, "bundled template"),
            TemplateSource::FileSystem(path) => {
                write!(f, "local path: '{}'", path.display())
            }
        }
    }
}

/// Trait for loading templates from different sources.
pub trait TemplateLoader {
    /// Loads the whole template into memory.
    fn load(&self) -> Result<Node>;
}

/// Loader for the template embedded in the binary.
#[derive(Debug, Default)]
pub struct BundledLoader;

impl BundledLoader {
    pub fn new() -> Self {
        Self
    }
}

impl TemplateLoader for BundledLoader {
    fn load(&self) -> Result<Node> {
        let mut root = Node::empty_dir();
        for path in BundledAssets::iter() {
            let Some(file) = BundledAssets::get(&path) else {
                continue;
            };
            debug!("Loaded bundled file '{}'.", path);
            root.insert(&path, Node::file(file.data.into_owned()));
        }
        Ok(root)
    }
}

/// Loader for templates from the local filesystem.
pub struct LocalLoader<P: AsRef<Path>> {
    path: P,
}

impl<P: AsRef<Path>> LocalLoader<P> {
    /// Creates a new LocalLoader instance.
    pub fn new(path: P) -> Self {
        Self { path }
    }
}

impl<P: AsRef<Path>> TemplateLoader for LocalLoader<P> {
    /// Loads a template directory, skipping ignored paths.
    ///
    /// # Errors
    /// * `Error::TemplateError` if the path is not a directory or cannot be read
    fn load(&self) -> Result<Node> {
        let root_path = self.path.as_ref();
        if !root_path.is_dir() {
            return Err(Error::TemplateError(format!(
                "template directory '{}' does not exist",
                root_path.display()
            )));
        }

        let ignored = parse_sproutignore_file(root_path)?;
        let mut root = Node::empty_dir();

        // Symlinks are resolved so entries carry the target's type and mode.
        let walker = WalkDir::new(root_path)
            .min_depth(1)
            .follow_links(true)
            .into_iter()
            .filter_entry(|entry| {
                let relative = entry.path().strip_prefix(root_path).unwrap_or(entry.path());
                let skip = ignored.is_match(relative) || relative == Path::new(IGNORE_FILE);
                if skip {
                    debug!("Skipping '{}' (ignored).", relative.display());
                }
                !skip
            });

        for entry in walker {
            let entry = entry.map_err(|e| Error::TemplateError(e.to_string()))?;
            let relative = entry
                .path()
                .strip_prefix(root_path)
                .map_err(|e| Error::TemplateError(e.to_string()))?;
            let key = template_key(relative)?;
            let metadata = entry.metadata().map_err(|e| Error::TemplateError(e.to_string()))?;

            let node = if metadata.is_dir() {
                Node::empty_dir()
            } else {
                Node::file(fs::read(entry.path())?)
            };
            let node = match permission_bits(&metadata) {
                Some(mode) => node.with_mode(mode),
                None => node,
            };
            root.insert(&key, node);
        }

        Ok(root)
    }
}

/// Joins path components with `/` regardless of platform.
fn template_key(relative: &Path) -> Result<String> {
    let parts = relative
        .components()
        .map(|c| {
            c.as_os_str().to_str().map(str::to_string).ok_or_else(|| {
                Error::TemplateError(format!(
                    "template path '{}' is not valid UTF-8",
                    relative.display()
                ))
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(parts.join("/"))
}

#[cfg(unix)]
fn permission_bits(metadata: &fs::Metadata) -> Option<u32> {
    use std::os::unix::fs::PermissionsExt;
    Some(metadata.permissions().mode() & 0o7777)
}

#[cfg(not(unix))]
fn permission_bits(_metadata: &fs::Metadata) -> Option<u32> {
    None
}

/// Loads the template tree for a project.
///
/// The bundled template is the base when `use_bundled` is set; a filesystem
/// template, when given, is overlaid on top of it.
///
/// # Arguments
/// * `use_bundled` - Start from the template compiled into the binary
/// * `custom` - Optional template directory on disk
///
/// # Errors
/// * `Error::TemplateError` if neither source is enabled or a directory cannot be read
/// * `Error::SproutIgnoreError` if the ignore file of `custom` is invalid
pub fn load_template(use_bundled: bool, custom: Option<&Path>) -> Result<Node> {
    let mut sources = Vec::new();
    if use_bundled {
        sources.push(TemplateSource::Bundled);
    }
    if let Some(path) = custom {
        sources.push(TemplateSource::FileSystem(path.to_path_buf()));
    }
    if sources.is_empty() {
        return Err(Error::TemplateError(
            "the bundled template is disabled and no template folder is set".to_string(),
        ));
    }

    let mut root = Node::empty_dir();
    for source in sources {
        debug!("Using template from the {}", source);
        let loader: Box<dyn TemplateLoader> = match &source {
            TemplateSource::Bundled => Box::new(BundledLoader::new()),
            TemplateSource::FileSystem(path) => Box::new(LocalLoader::new(path.clone())),
        };
        root.overlay(loader.load()?);
    }
    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_source_display() {
        let fs_source = TemplateSource::FileSystem(PathBuf::from("/path/to/template"));
        assert_eq!(format!("{}", fs_source), "local path: '/path/to/template'");
        assert_eq!(format!("{}", TemplateSource::Bundled), "bundled template");
    }

    #[test]
    fn test_bundled_template_is_embedded() {
        let root = BundledLoader::new().load().unwrap();
        assert!(root.get("pyproject.toml").is_some());
        assert!(root.get("{{package_name}}/main.py").is_some());
        assert!(root.get("tests").unwrap().is_dir());
    }

    #[test]
    fn test_no_source_is_an_error() {
        assert!(matches!(load_template(false, None), Err(Error::TemplateError(_))));
    }
}
