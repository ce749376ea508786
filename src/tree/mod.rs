//! File tree engine: lifecycle, traversal, insertion, removal, queries,
//! and canonical serialization.
//!
//! A [`FileTree`] owns every node of one hierarchy through its arena.
//! All operations address nodes by absolute path strings; the engine
//! parses them, walks depth-indexed prefixes to the furthest existing
//! node, and extends or prunes the tree from there. Multi-level inserts
//! are atomic: a failure mid-chain destroys everything the call created.

pub mod checker;
pub mod node;

use crate::error::{Result, TreeError};
use crate::path::TreePath;
use crate::types::{NodeStat, TreeStatus, ValidateReport};
use node::{NodeArena, NodeId, NodeKind};
use std::fmt;
use tracing::{debug, info};

/// What the final level of an insertion becomes.
enum Terminal {
    Dir,
    File(Option<Vec<u8>>),
}

/// In-memory hierarchical file tree.
///
/// Starts uninitialized; [`FileTree::init`] and [`FileTree::destroy`]
/// cycle it between the two lifecycle states. Nearly every operation
/// fails with [`TreeError::NotInitialized`] outside the initialized
/// state.
#[derive(Debug, Default)]
pub struct FileTree {
    initialized: bool,
    root: Option<NodeId>,
    count: usize,
    arena: NodeArena,
}

impl FileTree {
    /// A new, uninitialized tree.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Number of live nodes.
    pub fn node_count(&self) -> usize {
        self.count
    }

    /// Transition to the initialized state with an empty hierarchy.
    pub fn init(&mut self) -> Result<()> {
        if self.initialized {
            return Err(TreeError::AlreadyInitialized);
        }
        self.initialized = true;
        self.root = None;
        self.count = 0;
        info!("file tree initialized");
        self.assert_invariants();
        Ok(())
    }

    /// Destroy the whole hierarchy and return to the uninitialized state.
    pub fn destroy(&mut self) -> Result<()> {
        if !self.initialized {
            return Err(TreeError::NotInitialized);
        }
        if let Some(root) = self.root.take() {
            let freed = self.arena.destroy(root);
            self.count -= freed;
        }
        self.initialized = false;
        info!("file tree destroyed");
        self.assert_invariants();
        Ok(())
    }

    /// Insert a directory at `path`, creating any missing ancestor
    /// directories.
    pub fn insert_dir(&mut self, path: &str) -> Result<()> {
        self.insert_path(path, Terminal::Dir)
    }

    /// Insert a file at `path`, creating any missing ancestor
    /// directories. The contents buffer may be absent.
    ///
    /// A depth-1 path fails with [`TreeError::ConflictingPath`]: the root
    /// position belongs to a directory.
    pub fn insert_file(&mut self, path: &str, contents: Option<Vec<u8>>) -> Result<()> {
        self.insert_path(path, Terminal::File(contents))
    }

    /// Remove the directory at `path` together with its whole subtree.
    pub fn remove_dir(&mut self, path: &str) -> Result<()> {
        let id = self.find_node(path)?;
        if self.arena.node(id).is_file() {
            return Err(TreeError::NotADirectory(path.to_string()));
        }
        let freed = self.remove_node(id);
        debug!(path, freed, "removed directory subtree");
        self.assert_invariants();
        Ok(())
    }

    /// Remove the file at `path`.
    pub fn remove_file(&mut self, path: &str) -> Result<()> {
        let id = self.find_node(path)?;
        if self.arena.node(id).is_directory() {
            return Err(TreeError::NotAFile(path.to_string()));
        }
        let freed = self.remove_node(id);
        debug!(path, freed, "removed file");
        self.assert_invariants();
        Ok(())
    }

    /// True iff a directory exists at exactly `path`. Never fails:
    /// any error, including an uninitialized tree, reads as `false`.
    pub fn contains_dir(&self, path: &str) -> bool {
        matches!(self.find_node(path), Ok(id) if self.arena.node(id).is_directory())
    }

    /// True iff a file exists at exactly `path`. Never fails.
    pub fn contains_file(&self, path: &str) -> bool {
        matches!(self.find_node(path), Ok(id) if self.arena.node(id).is_file())
    }

    /// Contents of the file at `path`.
    ///
    /// `None` on any failure, but also for a file whose payload is
    /// absent, so this is not an existence probe; use
    /// [`FileTree::contains_file`] for that.
    pub fn get_file_contents(&self, path: &str) -> Option<&[u8]> {
        let id = self.find_node(path).ok()?;
        self.arena.node(id).contents()
    }

    /// Swap the contents of the file at `path`, returning the previous
    /// buffer. `None` on any failure, and also when there was no
    /// previous buffer.
    pub fn replace_file_contents(
        &mut self,
        path: &str,
        new_contents: Option<Vec<u8>>,
    ) -> Option<Vec<u8>> {
        let id = self.find_node(path).ok()?;
        match self.arena.replace_contents(id, new_contents) {
            Ok(old) => {
                debug!(path, "replaced file contents");
                self.assert_invariants();
                old
            }
            Err(_) => None,
        }
    }

    /// Kind and size of the node at exactly `path`.
    pub fn stat(&self, path: &str) -> Result<NodeStat> {
        let id = self.find_node(path)?;
        let node = self.arena.node(id);
        Ok(NodeStat {
            is_file: node.is_file(),
            size: node.is_file().then(|| node.size()),
        })
    }

    /// Summary of the engine's tracked state.
    pub fn status(&self) -> TreeStatus {
        TreeStatus {
            initialized: self.initialized,
            node_count: self.count,
            root: self.root.map(|id| self.arena.node(id).path().to_string()),
        }
    }

    /// Walk the whole tree and report every violated structural
    /// invariant. Read-only; a non-empty report means an engine bug.
    pub fn validate(&self) -> ValidateReport {
        checker::validate_tree(self.initialized, self.root, self.count, &self.arena)
    }

    /// Walk from the root as far as possible towards `target`.
    ///
    /// `Ok(None)` on an empty tree. `ConflictingPath` when the tree is
    /// rooted under a different top-level component. Otherwise the
    /// deepest node whose path prefixes `target` — possibly a file,
    /// possibly `target` itself.
    fn traverse(&self, target: &TreePath) -> Result<Option<NodeId>> {
        let root_id = match self.root {
            Some(id) => id,
            None => return Ok(None),
        };
        let root_path = self.arena.node(root_id).path();
        if target.shared_prefix_depth(root_path) < root_path.depth() {
            return Err(TreeError::ConflictingPath(target.to_string()));
        }

        let mut current = root_id;
        for depth in 2..=target.depth() {
            // files end the walk; they have no children to descend into
            if self.arena.node(current).is_file() {
                break;
            }
            match self.arena.find_child(current, &target.prefix(depth)) {
                Some(child) => current = child,
                None => break,
            }
        }
        Ok(Some(current))
    }

    /// Find the node at exactly `raw`, or fail.
    fn find_node(&self, raw: &str) -> Result<NodeId> {
        if !self.initialized {
            return Err(TreeError::NotInitialized);
        }
        let target: TreePath = raw.parse()?;
        let furthest = self
            .traverse(&target)?
            .ok_or_else(|| TreeError::NoSuchPath(raw.to_string()))?;
        if self.arena.node(furthest).path() != &target {
            return Err(TreeError::NoSuchPath(raw.to_string()));
        }
        Ok(furthest)
    }

    fn insert_path(&mut self, raw: &str, terminal: Terminal) -> Result<()> {
        if !self.initialized {
            return Err(TreeError::NotInitialized);
        }
        let target: TreePath = raw.parse()?;
        let is_file = matches!(terminal, Terminal::File(_));
        if is_file && target.depth() == 1 {
            return Err(TreeError::ConflictingPath(raw.to_string()));
        }

        let (mut parent, start_depth) = match self.traverse(&target)? {
            Some(id) => {
                let furthest = self.arena.node(id);
                if furthest.path() == &target {
                    return Err(TreeError::AlreadyInTree(raw.to_string()));
                }
                if furthest.is_file() {
                    return Err(TreeError::NotADirectory(furthest.path().to_string()));
                }
                (Some(id), furthest.path().depth() + 1)
            }
            None => (None, 1),
        };

        let mut contents = match terminal {
            Terminal::File(contents) => contents,
            Terminal::Dir => None,
        };

        // extend one level at a time; on failure, tear down everything
        // this call created so no partial chain remains
        let mut first_new: Option<NodeId> = None;
        let mut created = 0usize;
        for depth in start_depth..=target.depth() {
            let prefix = target.prefix(depth);
            let result = if depth == target.depth() && is_file {
                self.arena.create_file(prefix, parent, contents.take())
            } else {
                self.arena.create_dir(prefix, parent)
            };
            match result {
                Ok(id) => {
                    first_new.get_or_insert(id);
                    parent = Some(id);
                    created += 1;
                }
                Err(err) => {
                    if let Some(first) = first_new {
                        self.arena.destroy(first);
                    }
                    return Err(err);
                }
            }
        }

        if self.root.is_none() {
            self.root = first_new;
        }
        self.count += created;
        debug!(
            path = %target,
            created,
            kind = if is_file { "file" } else { "dir" },
            "inserted path"
        );
        self.assert_invariants();
        Ok(())
    }

    fn remove_node(&mut self, id: NodeId) -> usize {
        let freed = self.arena.destroy(id);
        self.count -= freed;
        if self.count == 0 {
            self.root = None;
        }
        freed
    }

    #[cfg(debug_assertions)]
    fn assert_invariants(&self) {
        let report = self.validate();
        assert!(report.valid, "tree invariants violated: {:?}", report.errors);
    }

    #[cfg(not(debug_assertions))]
    fn assert_invariants(&self) {}
}

impl fmt::Display for FileTree {
    /// Pre-order rendering, one absolute path per line; children follow
    /// the sorted child order (files before directories). Empty when the
    /// tree is uninitialized or empty.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.initialized {
            return Ok(());
        }
        let mut stack = match self.root {
            Some(id) => vec![id],
            None => return Ok(()),
        };
        while let Some(id) = stack.pop() {
            let node = self.arena.node(id);
            writeln!(f, "{}", node.path())?;
            if let NodeKind::Directory { children } = node.kind() {
                stack.extend(children.iter().rev());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn initialized() -> FileTree {
        let mut tree = FileTree::new();
        tree.init().unwrap();
        tree
    }

    #[test]
    fn test_lifecycle_state_machine() {
        let mut tree = FileTree::new();
        assert_eq!(tree.destroy(), Err(TreeError::NotInitialized));
        assert_eq!(tree.insert_dir("/a"), Err(TreeError::NotInitialized));
        tree.init().unwrap();
        assert_eq!(tree.init(), Err(TreeError::AlreadyInitialized));
        tree.insert_dir("/a/b").unwrap();
        tree.destroy().unwrap();
        assert_eq!(tree.node_count(), 0);
        // a destroyed tree can be initialized again, empty
        tree.init().unwrap();
        assert!(!tree.contains_dir("/a"));
    }

    #[test]
    fn test_traverse_stops_at_furthest_prefix() {
        let mut tree = initialized();
        tree.insert_dir("/a/b").unwrap();
        let target: TreePath = "/a/b/c/d".parse().unwrap();
        let furthest = tree.traverse(&target).unwrap().unwrap();
        assert_eq!(tree.arena.node(furthest).path().to_string(), "/a/b");
    }

    #[test]
    fn test_traverse_rejects_foreign_root() {
        let mut tree = initialized();
        tree.insert_dir("/a").unwrap();
        let target: TreePath = "/x/y".parse().unwrap();
        assert_eq!(
            tree.traverse(&target),
            Err(TreeError::ConflictingPath("/x/y".to_string()))
        );
    }

    #[test]
    fn test_insert_file_cannot_be_root() {
        let mut tree = initialized();
        assert_eq!(
            tree.insert_file("/f", None),
            Err(TreeError::ConflictingPath("/f".to_string()))
        );
        // deeper file paths may create the whole chain, dirs on the way
        tree.insert_file("/a/b/f", Some(b"x".to_vec())).unwrap();
        assert!(tree.contains_dir("/a"));
        assert!(tree.contains_dir("/a/b"));
        assert!(tree.contains_file("/a/b/f"));
        assert_eq!(tree.node_count(), 3);
    }

    #[test]
    fn test_insert_propagates_bad_path() {
        let mut tree = initialized();
        assert_eq!(
            tree.insert_dir("a//b"),
            Err(TreeError::BadPath("a//b".to_string()))
        );
    }

    #[test]
    fn test_display_is_empty_until_initialized_and_rooted() {
        let mut tree = FileTree::new();
        assert_eq!(tree.to_string(), "");
        tree.init().unwrap();
        assert_eq!(tree.to_string(), "");
        tree.insert_dir("/a").unwrap();
        assert_eq!(tree.to_string(), "/a\n");
    }

    #[test]
    fn test_status_reflects_engine_state() {
        let mut tree = FileTree::new();
        assert_eq!(
            tree.status(),
            TreeStatus {
                initialized: false,
                node_count: 0,
                root: None
            }
        );
        tree.init().unwrap();
        tree.insert_dir("/a/b").unwrap();
        assert_eq!(
            tree.status(),
            TreeStatus {
                initialized: true,
                node_count: 2,
                root: Some("/a".to_string())
            }
        );
    }

    #[test]
    fn test_validate_reports_clean_tree() {
        let mut tree = initialized();
        tree.insert_dir("/a/b/c").unwrap();
        tree.insert_file("/a/f", None).unwrap();
        let report = tree.validate();
        assert!(report.valid, "{:?}", report.errors);
        assert_eq!(report.node_count, 4);
    }
}
