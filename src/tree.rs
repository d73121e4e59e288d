//! In-memory template tree.
//! Templates from every source are loaded into the same [`Node`] structure
//! before they are rendered, so the walker never touches the source again.

use std::collections::BTreeMap;

/// A node of the template tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Directory {
        children: BTreeMap<String, Node>,
        /// Unix permission bits, when the source had them.
        mode: Option<u32>,
    },
    File {
        contents: Vec<u8>,
        mode: Option<u32>,
    },
}

impl Node {
    pub fn empty_dir() -> Self {
        Node::Directory { children: BTreeMap::new(), mode: None }
    }

    pub fn file<C: Into<Vec<u8>>>(contents: C) -> Self {
        Node::File { contents: contents.into(), mode: None }
    }

    pub fn with_mode(mut self, new_mode: u32) -> Self {
        match &mut self {
            Node::Directory { mode, .. } | Node::File { mode, .. } => *mode = Some(new_mode),
        }
        self
    }

    pub fn mode(&self) -> Option<u32> {
        match self {
            Node::Directory { mode, .. } | Node::File { mode, .. } => *mode,
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, Node::Directory { .. })
    }

    /// True for files whose contents go through placeholder substitution:
    /// valid UTF-8 without NUL bytes. Everything else is copied verbatim.
    pub fn is_text(&self) -> bool {
        match self {
            Node::File { contents, .. } => {
                !contents.contains(&0) && std::str::from_utf8(contents).is_ok()
            }
            Node::Directory { .. } => false,
        }
    }

    pub fn children(&self) -> Option<&BTreeMap<String, Node>> {
        match self {
            Node::Directory { children, .. } => Some(children),
            Node::File { .. } => None,
        }
    }

    /// Looks up a `/` separated path below this node.
    pub fn get(&self, path: &str) -> Option<&Node> {
        path.split('/')
            .filter(|part| !part.is_empty())
            .try_fold(self, |node, part| node.children()?.get(part))
    }

    /// Inserts `node` at a `/` separated path, creating intermediate
    /// directories. An existing file on the way is replaced by a directory.
    pub fn insert(&mut self, path: &str, node: Node) {
        let mut parts: Vec<&str> = path.split('/').filter(|part| !part.is_empty()).collect();
        let Some(last) = parts.pop() else {
            return;
        };
        let mut current = self;
        for part in parts {
            if !current.is_dir() {
                *current = Node::empty_dir();
            }
            current = match current {
                Node::Directory { children, .. } => {
                    children.entry(part.to_string()).or_insert_with(Node::empty_dir)
                }
                Node::File { .. } => return,
            };
        }
        if !current.is_dir() {
            *current = Node::empty_dir();
        }
        if let Node::Directory { children, .. } = current {
            children.insert(last.to_string(), node);
        }
    }

    /// Removes the node at a `/` separated path, returning it.
    pub fn remove(&mut self, path: &str) -> Option<Node> {
        let (parent, name) = match path.trim_matches('/').rsplit_once('/') {
            Some((parent, name)) => (parent, name),
            None => ("", path.trim_matches('/')),
        };
        let parent = self.get_mut(parent)?;
        match parent {
            Node::Directory { children, .. } => children.remove(name),
            Node::File { .. } => None,
        }
    }

    fn get_mut(&mut self, path: &str) -> Option<&mut Node> {
        let mut current = self;
        for part in path.split('/').filter(|part| !part.is_empty()) {
            current = match current {
                Node::Directory { children, .. } => children.get_mut(part)?,
                Node::File { .. } => return None,
            };
        }
        Some(current)
    }

    /// Overlays `other` onto this tree. Directories are merged recursively;
    /// any other pairing is won by `other`.
    pub fn overlay(&mut self, other: Node) {
        match (self, other) {
            (
                Node::Directory { children, mode },
                Node::Directory { children: other_children, mode: other_mode },
            ) => {
                if other_mode.is_some() {
                    *mode = other_mode;
                }
                for (name, child) in other_children {
                    match children.get_mut(&name) {
                        Some(existing) => existing.overlay(child),
                        None => {
                            children.insert(name, child);
                        }
                    }
                }
            }
            (this, other) => *this = other,
        }
    }

    /// Number of files in the tree.
    pub fn file_count(&self) -> usize {
        match self {
            Node::File { .. } => 1,
            Node::Directory { children, .. } => children.values().map(Node::file_count).sum(),
        }
    }
}

impl Default for Node {
    fn default() -> Self {
        Node::empty_dir()
    }
}
