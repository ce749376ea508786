//! Absolute slash-delimited path values.
//!
//! `TreePath` is the immutable location type every tree operation is
//! addressed by: a non-empty sequence of non-empty components. Depth-indexed
//! prefixes and shared-prefix depth drive traversal and ancestor checks.

use crate::error::TreeError;
use std::fmt;
use std::str::FromStr;

/// An absolute path: one or more non-empty components.
///
/// Ordering is component-wise lexicographic, so a path always sorts before
/// any path it is a proper prefix of.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TreePath {
    components: Vec<String>,
}

impl TreePath {
    /// Number of components; always at least 1.
    pub fn depth(&self) -> usize {
        self.components.len()
    }

    /// The path's components in order.
    pub fn components(&self) -> &[String] {
        &self.components
    }

    /// Final component.
    pub fn name(&self) -> &str {
        // components is non-empty by construction
        &self.components[self.components.len() - 1]
    }

    /// The path formed by the first `depth` components.
    ///
    /// # Panics
    ///
    /// Panics if `depth` is zero or exceeds [`TreePath::depth`].
    pub fn prefix(&self, depth: usize) -> TreePath {
        assert!(
            depth >= 1 && depth <= self.depth(),
            "prefix depth {} out of range 1..={}",
            depth,
            self.depth()
        );
        TreePath {
            components: self.components[..depth].to_vec(),
        }
    }

    /// Count of leading components equal between `self` and `other`.
    pub fn shared_prefix_depth(&self, other: &TreePath) -> usize {
        self.components
            .iter()
            .zip(other.components.iter())
            .take_while(|(a, b)| a == b)
            .count()
    }

    /// True when every component of `self` leads `other`.
    pub fn is_prefix_of(&self, other: &TreePath) -> bool {
        self.shared_prefix_depth(other) == self.depth()
    }
}

impl FromStr for TreePath {
    type Err = TreeError;

    /// Parses an absolute path of the form `/a/b/c`.
    ///
    /// Rejects the empty string, a missing leading separator, a bare `/`,
    /// and empty components from doubled or trailing separators.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s
            .strip_prefix('/')
            .ok_or_else(|| TreeError::BadPath(s.to_string()))?;
        if rest.is_empty() {
            return Err(TreeError::BadPath(s.to_string()));
        }
        let components: Vec<String> = rest.split('/').map(str::to_string).collect();
        if components.iter().any(|c| c.is_empty()) {
            return Err(TreeError::BadPath(s.to_string()));
        }
        Ok(TreePath { components })
    }
}

impl fmt::Display for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.components.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(s: &str) -> TreePath {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_and_render_round_trip() {
        for s in ["/a", "/a/b/c", "/srv/data/logs.txt"] {
            assert_eq!(path(s).to_string(), s);
        }
    }

    #[test]
    fn test_parse_rejects_malformed_input() {
        for s in ["", "/", "a/b", "/a//b", "/a/", "//a"] {
            assert_eq!(
                s.parse::<TreePath>(),
                Err(TreeError::BadPath(s.to_string())),
                "expected BadPath for {:?}",
                s
            );
        }
    }

    #[test]
    fn test_depth_and_components() {
        let p = path("/a/b/c");
        assert_eq!(p.depth(), 3);
        assert_eq!(p.components(), ["a", "b", "c"]);
        assert_eq!(p.name(), "c");
    }

    #[test]
    fn test_prefix_truncates_components() {
        let p = path("/a/b/c");
        assert_eq!(p.prefix(1), path("/a"));
        assert_eq!(p.prefix(2), path("/a/b"));
        assert_eq!(p.prefix(3), p);
    }

    #[test]
    #[should_panic]
    fn test_prefix_zero_panics() {
        let _ = path("/a").prefix(0);
    }

    #[test]
    fn test_shared_prefix_depth() {
        assert_eq!(path("/a/b/c").shared_prefix_depth(&path("/a/b/d")), 2);
        assert_eq!(path("/a/b").shared_prefix_depth(&path("/a/b/c")), 2);
        assert_eq!(path("/x").shared_prefix_depth(&path("/a/b")), 0);
    }

    #[test]
    fn test_prefix_is_ancestor() {
        assert!(path("/a").is_prefix_of(&path("/a/b/c")));
        assert!(!path("/a/b").is_prefix_of(&path("/a")));
        assert!(!path("/b").is_prefix_of(&path("/a/b")));
    }

    #[test]
    fn test_ordering_is_component_wise() {
        assert!(path("/a") < path("/a/b"));
        assert!(path("/a/b") < path("/a/c"));
        // "a.b" compares against the component "a", not the rendered string
        assert!(path("/a/b") < path("/a.b"));
    }
}
