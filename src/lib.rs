//! Arbor: In-Memory Hierarchical File Tree
//!
//! A filesystem-like hierarchy of directories and files addressed by
//! absolute slash-delimited paths, with atomic multi-level insertion,
//! whole-subtree removal, content mutation, canonical serialization,
//! and a structural invariant checker re-run after every mutation in
//! debug builds.

pub mod error;
pub mod path;
pub mod tree;
pub mod types;

pub use error::{Result, TreeError};
pub use path::TreePath;
pub use tree::node::{Node, NodeArena, NodeId, NodeKind};
pub use tree::FileTree;
pub use types::{NodeStat, TreeStatus, ValidateReport};
