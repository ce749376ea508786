//! Read-only structural validation of the whole tree.
//!
//! The checker never mutates or repairs anything: a violation it reports
//! is a bug in the tree engine, not a runtime condition to recover from.
//! The engine re-runs it after every mutation in debug builds, and
//! [`crate::FileTree::validate`] exposes it as a callable diagnostic.

use crate::path::TreePath;
use crate::tree::node::{NodeArena, NodeId, NodeKind};
use crate::types::ValidateReport;
use std::collections::HashSet;

/// Check a single node's parent linkage: the node resolves, and if it has
/// a parent, the parent resolves and its path is the exact
/// (depth − 1)-prefix of the node's path.
pub fn node_is_valid(arena: &NodeArena, id: NodeId) -> bool {
    let Some(node) = arena.get(id) else {
        return false;
    };
    match node.parent() {
        None => true,
        Some(pid) => match arena.get(pid) {
            None => false,
            Some(parent) => {
                node.path().shared_prefix_depth(parent.path()) == parent.path().depth()
                    && node.path().depth() == parent.path().depth() + 1
            }
        },
    }
}

/// Walk the whole tree and report every violated invariant.
///
/// `initialized`, `root`, and `count` are the engine's tracked state; the
/// walk recomputes what they should be from the arena.
pub(crate) fn validate_tree(
    initialized: bool,
    root: Option<NodeId>,
    count: usize,
    arena: &NodeArena,
) -> ValidateReport {
    let mut errors = Vec::new();

    if !initialized {
        if root.is_some() {
            errors.push("uninitialized tree has a root".to_string());
        }
        if count != 0 {
            errors.push(format!("uninitialized tree reports {} nodes", count));
        }
        if !arena.is_empty() {
            errors.push(format!(
                "uninitialized tree still holds {} arena nodes",
                arena.len()
            ));
        }
        return ValidateReport {
            valid: errors.is_empty(),
            node_count: 0,
            errors,
        };
    }

    let mut visited = 0usize;
    let mut seen_paths: HashSet<String> = HashSet::new();

    if let Some(root_id) = root {
        match arena.get(root_id) {
            None => errors.push("root id does not resolve".to_string()),
            Some(root_node) => {
                if root_node.parent().is_some() {
                    errors.push(format!("root {} has a parent", root_node.path()));
                }
                if root_node.path().depth() != 1 {
                    errors.push(format!("root {} is not at depth 1", root_node.path()));
                }
                walk(arena, root_id, &mut visited, &mut seen_paths, &mut errors);
            }
        }
    }

    if visited != count {
        errors.push(format!(
            "node count mismatch: tracked {}, reachable {}",
            count, visited
        ));
    }
    if arena.len() != visited {
        errors.push(format!(
            "arena holds {} nodes but only {} are reachable",
            arena.len(),
            visited
        ));
    }

    ValidateReport {
        valid: errors.is_empty(),
        node_count: visited,
        errors,
    }
}

/// Pre-order walk from `root_id`, checking per-node and per-sibling
/// invariants and counting every node reached.
fn walk(
    arena: &NodeArena,
    root_id: NodeId,
    visited: &mut usize,
    seen_paths: &mut HashSet<String>,
    errors: &mut Vec<String>,
) {
    let mut stack = vec![root_id];
    while let Some(id) = stack.pop() {
        let Some(node) = arena.get(id) else {
            errors.push("child id does not resolve".to_string());
            continue;
        };
        *visited += 1;

        let rendered = node.path().to_string();
        if !seen_paths.insert(rendered.clone()) {
            errors.push(format!("duplicate path {}", rendered));
        }
        if !node_is_valid(arena, id) {
            errors.push(format!("bad parent linkage at {}", rendered));
        }

        let NodeKind::Directory { children } = node.kind() else {
            continue;
        };

        let mut previous: Option<(bool, &TreePath)> = None;
        for &child_id in children {
            let Some(child) = arena.get(child_id) else {
                errors.push(format!("unresolvable child under {}", rendered));
                continue;
            };
            if child.parent() != Some(id) {
                errors.push(format!(
                    "child {} does not point back to {}",
                    child.path(),
                    rendered
                ));
            }
            // files sort before directories, each group strictly ascending
            let key = (child.is_directory(), child.path());
            if let Some(prev) = previous {
                if prev >= key {
                    errors.push(format!("children of {} out of order", rendered));
                }
            }
            previous = Some(key);
            stack.push(child_id);
        }
    }
}
