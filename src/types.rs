//! Serializable read-model types for tree status, stat, and validation.

use serde::{Deserialize, Serialize};

/// Result of [`crate::FileTree::stat`] for a single node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeStat {
    /// True for file nodes, false for directories.
    pub is_file: bool,
    /// Content size in bytes; `None` for directories.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/// Point-in-time summary of the whole tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeStatus {
    pub initialized: bool,
    pub node_count: usize,
    /// Rendered root path; `None` while the tree is empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,
}

/// Result of a structural validation pass over the tree.
///
/// `node_count` is the number of nodes actually reached from the root,
/// which the engine's tracked count must match. `errors` holds one entry
/// per violated invariant; `valid` is true iff it is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateReport {
    pub valid: bool,
    pub node_count: usize,
    pub errors: Vec<String>,
}
