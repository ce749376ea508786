//! Error types for file tree operations.

use thiserror::Error;

/// Errors surfaced by path parsing, node construction, and tree operations.
///
/// Every variant that concerns a specific location carries the offending
/// path string. Read-only predicates on the tree collapse these into a
/// negative result instead of propagating them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The operation requires an initialized tree.
    #[error("file tree is not initialized")]
    NotInitialized,

    /// `init` was called on a tree that is already initialized.
    #[error("file tree is already initialized")]
    AlreadyInitialized,

    /// The path string is malformed (empty, missing leading separator,
    /// or containing empty components).
    #[error("malformed path: {0:?}")]
    BadPath(String),

    /// The path cannot exist under the current root, or a prospective
    /// parent node is not an ancestor of the path at all.
    #[error("path {0:?} conflicts with the existing tree root")]
    ConflictingPath(String),

    /// No node with this path exists, or a parent/child linkage would
    /// skip levels.
    #[error("no such path: {0:?}")]
    NoSuchPath(String),

    /// A directory was required but a file was found.
    #[error("not a directory: {0:?}")]
    NotADirectory(String),

    /// A file was required but a directory was found.
    #[error("not a file: {0:?}")]
    NotAFile(String),

    /// A node with exactly this path is already present.
    #[error("already in tree: {0:?}")]
    AlreadyInTree(String),
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, TreeError>;
