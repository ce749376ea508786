//! File tree nodes and the arena that owns them.
//!
//! Nodes are stored in a [`NodeArena`] and refer to each other by
//! [`NodeId`], so a parent back-reference can never dangle: a stale id
//! simply stops resolving, which the invariant checker reports. Each
//! directory keeps its children in a single sorted vector, files before
//! directories, then lexicographic by path; every membership probe is a
//! binary search whose miss position doubles as the insertion point.

use crate::error::{Result, TreeError};
use crate::path::TreePath;
use std::collections::HashMap;
use std::fmt;

/// Opaque handle to a node in a [`NodeArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

/// Node payload: a directory with ordered children, or a file with an
/// optional contents buffer.
///
/// An absent file payload is legitimate and distinct from an empty one in
/// intent, so contents stay wrapped in `Option` rather than defaulting to
/// an empty buffer.
#[derive(Debug, Clone)]
pub enum NodeKind {
    Directory { children: Vec<NodeId> },
    File { contents: Option<Vec<u8>> },
}

/// A single node: its absolute path, a non-owning parent handle, and its
/// kind-specific payload.
#[derive(Debug, Clone)]
pub struct Node {
    path: TreePath,
    parent: Option<NodeId>,
    kind: NodeKind,
}

impl Node {
    /// The node's absolute path.
    pub fn path(&self) -> &TreePath {
        &self.path
    }

    /// Handle of the containing directory; `None` for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn is_file(&self) -> bool {
        matches!(self.kind, NodeKind::File { .. })
    }

    pub fn is_directory(&self) -> bool {
        matches!(self.kind, NodeKind::Directory { .. })
    }

    /// The node's payload variant.
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Content size in bytes; 0 for directories and absent payloads.
    pub fn size(&self) -> u64 {
        match &self.kind {
            NodeKind::File {
                contents: Some(buf),
            } => buf.len() as u64,
            _ => 0,
        }
    }

    /// File contents, if this is a file with a present payload.
    pub fn contents(&self) -> Option<&[u8]> {
        match &self.kind {
            NodeKind::File { contents } => contents.as_deref(),
            NodeKind::Directory { .. } => None,
        }
    }

    /// Sort position among siblings: files first, then directories,
    /// each group ascending by path.
    fn order_key(&self) -> (bool, &TreePath) {
        (self.is_directory(), &self.path)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.path.fmt(f)
    }
}

/// Owning store for every node of one tree.
#[derive(Debug, Default)]
pub struct NodeArena {
    nodes: HashMap<NodeId, Node>,
    next_id: u64,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Resolve a handle, if it is still live.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Resolve a handle that is known to be live.
    ///
    /// # Panics
    ///
    /// Panics if `id` was already destroyed; engine code only holds live
    /// handles, so a panic here means the tree structure is corrupt.
    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[&id]
    }

    /// Create a directory node under `parent` (or as a root when `None`).
    pub fn create_dir(&mut self, path: TreePath, parent: Option<NodeId>) -> Result<NodeId> {
        self.create(
            path,
            parent,
            NodeKind::Directory {
                children: Vec::new(),
            },
        )
    }

    /// Create a file node under `parent` (or as a root when `None`).
    pub fn create_file(
        &mut self,
        path: TreePath,
        parent: Option<NodeId>,
        contents: Option<Vec<u8>>,
    ) -> Result<NodeId> {
        self.create(path, parent, NodeKind::File { contents })
    }

    fn create(&mut self, path: TreePath, parent: Option<NodeId>, kind: NodeKind) -> Result<NodeId> {
        let link = match parent {
            None => {
                // a rootless node must sit at depth 1
                if path.depth() != 1 {
                    return Err(TreeError::NoSuchPath(path.to_string()));
                }
                None
            }
            Some(pid) => {
                let parent_node = self.node(pid);
                let parent_path = parent_node.path();
                if path.shared_prefix_depth(parent_path) < parent_path.depth() {
                    return Err(TreeError::ConflictingPath(path.to_string()));
                }
                if path.depth() != parent_path.depth() + 1 {
                    return Err(TreeError::NoSuchPath(path.to_string()));
                }
                if parent_node.is_file() {
                    return Err(TreeError::NotADirectory(parent_path.to_string()));
                }
                let is_file = matches!(kind, NodeKind::File { .. });
                let insert_at = match self.search_children(pid, &path, is_file) {
                    Ok(_) => return Err(TreeError::AlreadyInTree(path.to_string())),
                    Err(at) => at,
                };
                if self.search_children(pid, &path, !is_file).is_ok() {
                    return Err(TreeError::AlreadyInTree(path.to_string()));
                }
                Some((pid, insert_at))
            }
        };

        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, Node { path, parent, kind });

        if let Some((pid, insert_at)) = link {
            if let Some(NodeKind::Directory { children }) =
                self.nodes.get_mut(&pid).map(|n| &mut n.kind)
            {
                children.insert(insert_at, id);
            }
        }
        Ok(id)
    }

    /// Destroy `id` and its whole subtree, unlinking it from its parent.
    /// Returns the number of nodes freed.
    pub fn destroy(&mut self, id: NodeId) -> usize {
        if let Some(pid) = self.node(id).parent() {
            let position = {
                let child = self.node(id);
                self.search_children(pid, child.path(), child.is_file())
            };
            if let Ok(at) = position {
                if let Some(NodeKind::Directory { children }) =
                    self.nodes.get_mut(&pid).map(|n| &mut n.kind)
                {
                    children.remove(at);
                }
            }
        }

        let mut freed = 0;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(&current) {
                freed += 1;
                if let NodeKind::Directory { children } = node.kind {
                    stack.extend(children);
                }
            }
        }
        freed
    }

    /// Binary search `parent`'s children for `path` as the given kind.
    ///
    /// `Ok(index)` when a matching child exists, `Err(index)` with the
    /// sorted insertion point otherwise. A file parent has no children,
    /// so every probe misses at position 0.
    pub(crate) fn search_children(
        &self,
        parent: NodeId,
        path: &TreePath,
        is_file: bool,
    ) -> std::result::Result<usize, usize> {
        let children = match &self.node(parent).kind {
            NodeKind::Directory { children } => children,
            NodeKind::File { .. } => return Err(0),
        };
        let probe = (!is_file, path);
        children.binary_search_by(|child| {
            let key = self.node(*child).order_key();
            key.cmp(&probe)
        })
    }

    /// Find a child with `path` of either kind.
    pub(crate) fn find_child(&self, parent: NodeId, path: &TreePath) -> Option<NodeId> {
        let children = match &self.node(parent).kind {
            NodeKind::Directory { children } => children,
            NodeKind::File { .. } => return None,
        };
        self.search_children(parent, path, true)
            .or_else(|_| self.search_children(parent, path, false))
            .ok()
            .map(|at| children[at])
    }

    /// Number of children of a directory node.
    pub fn num_children(&self, id: NodeId) -> Result<usize> {
        match &self.node(id).kind {
            NodeKind::Directory { children } => Ok(children.len()),
            NodeKind::File { .. } => Err(TreeError::NotADirectory(self.node(id).path().to_string())),
        }
    }

    /// Child handle at `index` within a directory's sorted children.
    pub fn child_at(&self, id: NodeId, index: usize) -> Result<NodeId> {
        let node = self.node(id);
        match &node.kind {
            NodeKind::Directory { children } => children
                .get(index)
                .copied()
                .ok_or_else(|| TreeError::NoSuchPath(node.path().to_string())),
            NodeKind::File { .. } => Err(TreeError::NotADirectory(node.path().to_string())),
        }
    }

    /// Overwrite a file's payload, dropping any previous buffer.
    pub fn set_contents(&mut self, id: NodeId, contents: Option<Vec<u8>>) -> Result<()> {
        self.replace_contents(id, contents).map(|_| ())
    }

    /// Swap in a new payload and hand back whatever was there before.
    pub fn replace_contents(
        &mut self,
        id: NodeId,
        new_contents: Option<Vec<u8>>,
    ) -> Result<Option<Vec<u8>>> {
        let node = match self.nodes.get_mut(&id) {
            Some(node) => node,
            None => return Err(TreeError::NoSuchPath(format!("{:?}", id))),
        };
        match &mut node.kind {
            NodeKind::File { contents } => Ok(std::mem::replace(contents, new_contents)),
            NodeKind::Directory { .. } => Err(TreeError::NotAFile(node.path.to_string())),
        }
    }
}
