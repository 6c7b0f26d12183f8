//! Core types for selector synthesis
//!
//! A selector is assembled from `Knot`s, one candidate token per tree level.
//! A path is an ordered run of knots from the target node (level 0) outward
//! toward an ancestor; its total penalty ranks it against other candidates.

use serde::{Deserialize, Serialize};

/// Penalty score for using an id in a selector.
pub const PENALTY_ID: u32 = 0;
/// Penalty score for using a class name in a selector.
pub const PENALTY_CLASS: u32 = 1;
/// Penalty score for using an attribute test in a selector.
pub const PENALTY_ATTRIBUTE: u32 = 2;
/// Penalty score for using a bare tag name in a selector.
pub const PENALTY_TAG_NAME: u32 = 5;
/// Penalty score for using `:nth-of-type` in a selector.
pub const PENALTY_NTH_OF_TYPE: u32 = 10;
/// Penalty score for using `:nth-child` in a selector.
pub const PENALTY_NTH_CHILD: u32 = 50;

/// A single candidate selector token for one tree level.
///
/// `level` is the depth of the originating ancestor: 0 for the target node,
/// increasing toward the root. Adjacent levels render with a child
/// combinator, gaps with a descendant combinator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Knot {
    /// The rendered selector token (e.g., `#login`, `.nav-bar`, `li:nth-of-type(2)`).
    pub text: String,
    /// Penalty score for this token. Lower is better.
    pub penalty: u32,
    /// Depth of the originating ancestor, 0 = target node.
    pub level: usize,
}

impl Knot {
    /// Create a knot at level 0; the search assigns the real level when the
    /// knot is pushed onto the ancestor stack.
    pub fn new(text: impl Into<String>, penalty: u32) -> Self {
        Self {
            text: text.into(),
            penalty,
            level: 0,
        }
    }
}

/// An ordered run of knots, target node first, outward toward an ancestor.
pub type Path = Vec<Knot>;

/// Total penalty of a path: the sum of its knot penalties.
pub fn path_penalty(path: &[Knot]) -> u32 {
    path.iter().map(|knot| knot.penalty).sum()
}

/// Stable ascending sort by total penalty; ties keep discovery order.
pub fn sort_by_penalty(paths: &mut [Path]) {
    paths.sort_by_key(|path| path_penalty(path));
}

/// Query scope: the boundary within which uniqueness is evaluated and beyond
/// which ancestor walking stops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryScope<N> {
    /// The whole document.
    Document,
    /// A single element subtree (the element itself is excluded from matches).
    Element(N),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn knot(text: &str, penalty: u32, level: usize) -> Knot {
        Knot {
            text: text.into(),
            penalty,
            level,
        }
    }

    #[test]
    fn test_path_penalty_sums_knots() {
        let path = vec![knot("#a", PENALTY_ID, 0), knot("div", PENALTY_TAG_NAME, 1)];
        assert_eq!(path_penalty(&path), 5);
        assert_eq!(path_penalty(&[]), 0);
    }

    #[test]
    fn test_sort_by_penalty_is_stable() {
        let cheap_first = vec![knot(".first", PENALTY_CLASS, 0)];
        let cheap_second = vec![knot(".second", PENALTY_CLASS, 0)];
        let expensive = vec![knot("div:nth-child(3)", PENALTY_NTH_CHILD, 0)];
        let mut paths = vec![expensive.clone(), cheap_first.clone(), cheap_second.clone()];
        sort_by_penalty(&mut paths);
        assert_eq!(paths, vec![cheap_first, cheap_second, expensive]);
    }
}
