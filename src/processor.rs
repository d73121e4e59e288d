//! Template materialization.
//! Renders every path of a template tree, checks the result for conflicts,
//! and only then writes the project to disk.

use crate::context::TemplateContext;
use crate::error::{Error, Result};
use crate::renderer::TemplateRenderer;
use crate::tree::Node;
use log::debug;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// A rendered entry, ready to be written.
#[derive(Debug)]
struct PlannedEntry<'a> {
    template_path: String,
    target: PathBuf,
    node: &'a Node,
}

/// What happened to one generated path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOperation {
    CreateDir,
    Render,
    Copy,
}

impl std::fmt::Display for FileOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileOperation::CreateDir => write!(f, "Creating"),
            FileOperation::Render => write!(f, "Rendering"),
            FileOperation::Copy => write!(f, "Copying"),
        }
    }
}

/// One path written into the project, relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Written {
    pub path: PathBuf,
    pub operation: FileOperation,
}

/// Copies a template tree into a destination directory, substituting
/// placeholders in text files and in every path component.
pub struct Processor<'a> {
    engine: &'a dyn TemplateRenderer,
    context: &'a TemplateContext,
}

impl<'a> Processor<'a> {
    pub fn new(engine: &'a dyn TemplateRenderer, context: &'a TemplateContext) -> Self {
        Self { engine, context }
    }

    /// Writes `tree` into `dest`.
    ///
    /// # Errors
    /// * `Error::OutputDirectoryNotEmpty` if `dest` holds anything; nothing is written
    /// * `Error::InvalidRenderedPath` / `Error::PathCollision` from planning; nothing is written
    /// * `Error::WriteError` on the first failed write; earlier files stay on disk
    pub fn materialize<P: AsRef<Path>>(&self, tree: &Node, dest: P) -> Result<Vec<Written>> {
        let dest = dest.as_ref();
        ensure_output_dir(dest)?;

        let plan = self.plan(tree)?;
        debug!("Planned {} entries for '{}'.", plan.len(), dest.display());

        fs::create_dir_all(dest).map_err(|source| write_error(dest, source))?;

        let mut written = Vec::with_capacity(plan.len());
        // Directory modes are applied last so read-only directories can still be filled.
        let mut dir_modes = Vec::new();
        for entry in plan {
            let path = dest.join(&entry.target);
            let operation = self.write_entry(&entry, &path)?;
            debug!("{} '{}' from '{}'", operation, path.display(), entry.template_path);
            if operation == FileOperation::CreateDir {
                dir_modes.push((path, entry.node.mode()));
            }
            written.push(Written { path: entry.target, operation });
        }
        for (path, mode) in dir_modes.into_iter().rev() {
            if let Some(mode) = mode {
                set_mode(&path, mode)?;
            }
        }
        Ok(written)
    }

    /// Renders all destination paths depth-first, without touching the disk.
    fn plan<'t>(&self, tree: &'t Node) -> Result<Vec<PlannedEntry<'t>>> {
        let mut plan = Vec::new();
        let mut seen: HashMap<String, String> = HashMap::new();
        self.plan_children(tree, "", Path::new(""), &mut plan, &mut seen)?;
        Ok(plan)
    }

    fn plan_children<'t>(
        &self,
        node: &'t Node,
        template_prefix: &str,
        target_prefix: &Path,
        plan: &mut Vec<PlannedEntry<'t>>,
        seen: &mut HashMap<String, String>,
    ) -> Result<()> {
        let Some(children) = node.children() else {
            return Ok(());
        };
        for (name, child) in children {
            let template_path = if template_prefix.is_empty() {
                name.clone()
            } else {
                format!("{template_prefix}/{name}")
            };
            let rendered = self.engine.render(name, self.context);
            if !is_rendered_name_valid(&rendered) {
                return Err(Error::InvalidRenderedPath { template_path, rendered });
            }
            let target = target_prefix.join(&rendered);

            // Case-folded so the output is also safe on case-insensitive filesystems.
            let key = target.to_string_lossy().to_lowercase();
            if let Some(first) = seen.get(&key) {
                return Err(Error::PathCollision {
                    first: first.clone(),
                    second: template_path,
                    target: target.display().to_string(),
                });
            }
            seen.insert(key, template_path.clone());

            plan.push(PlannedEntry {
                template_path: template_path.clone(),
                target: target.clone(),
                node: child,
            });
            self.plan_children(child, &template_path, &target, plan, seen)?;
        }
        Ok(())
    }

    fn write_entry(&self, entry: &PlannedEntry<'_>, path: &Path) -> Result<FileOperation> {
        let operation = match entry.node {
            Node::Directory { .. } => {
                fs::create_dir_all(path).map_err(|source| write_error(path, source))?;
                return Ok(FileOperation::CreateDir);
            }
            Node::File { contents, .. } => match std::str::from_utf8(contents) {
                Ok(text) if entry.node.is_text() => {
                    let rendered = self.engine.render(text, self.context);
                    fs::write(path, rendered).map_err(|source| write_error(path, source))?;
                    FileOperation::Render
                }
                _ => {
                    fs::write(path, contents).map_err(|source| write_error(path, source))?;
                    FileOperation::Copy
                }
            },
        };
        if let Some(mode) = entry.node.mode() {
            set_mode(path, mode)?;
        }
        Ok(operation)
    }
}

/// Succeeds when `output_dir` is missing or an empty directory.
pub fn ensure_output_dir<P: AsRef<Path>>(output_dir: P) -> Result<()> {
    let output_dir = output_dir.as_ref();
    if !output_dir.exists() {
        return Ok(());
    }
    let occupied = !output_dir.is_dir() || fs::read_dir(output_dir)?.next().is_some();
    if occupied {
        return Err(Error::OutputDirectoryNotEmpty {
            output_dir: output_dir.display().to_string(),
        });
    }
    Ok(())
}

/// A rendered path component must stay a single, non-empty name.
pub fn is_rendered_name_valid(name: &str) -> bool {
    !name.trim().is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains('\0')
}

fn write_error(path: &Path, source: std::io::Error) -> Error {
    Error::WriteError { path: path.to_path_buf(), source }
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
        .map_err(|source| write_error(path, source))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}
