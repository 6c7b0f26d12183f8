//! Path rendering, uniqueness resolution, and positional fallback

use tracing::debug;

use crate::errors::FinderError;
use crate::ports::{is_scope_root, Dom};
use crate::synth::nth_of_type;
use crate::types::{Knot, Path, QueryScope};

/// Render a path into a selector string, outermost fragment first.
///
/// Fragments on adjacent levels join with a child combinator, gaps with a
/// descendant combinator; the target's own fragment ends up rightmost.
pub fn selector(path: &[Knot]) -> String {
    let mut knots = path.iter();
    let Some(first) = knots.next() else {
        return String::new();
    };
    let mut query = first.text.clone();
    let mut inner_level = first.level;
    for knot in knots {
        if inner_level + 1 == knot.level {
            query = format!("{} > {}", knot.text, query);
        } else {
            query = format!("{} {}", knot.text, query);
        }
        inner_level = knot.level;
    }
    query
}

/// Resolve a path against the scope.
///
/// Exactly one match returns the node; more than one returns `None` (the
/// candidate is rejected); zero matches is a fragment-synthesis invariant
/// violation and fails hard.
pub async fn unique_match<D: Dom>(
    dom: &D,
    path: &[Knot],
    scope: &QueryScope<D::Node>,
) -> Result<Option<D::Node>, FinderError> {
    let css = selector(path);
    let matches = dom.query(&css, scope).await?;
    match matches.len() {
        0 => Err(FinderError::NoMatch(css)),
        1 => Ok(matches.into_iter().next()),
        _ => Ok(None),
    }
}

/// Deterministic positional path: one `tag:nth-of-type` fragment per ancestor
/// level up to the scope root (exclusive). Returns `None` when any level has
/// no defined index or the rendered path is not unique.
pub async fn fallback<D: Dom>(
    dom: &D,
    input: &D::Node,
    scope: &QueryScope<D::Node>,
) -> Result<Option<Path>, FinderError> {
    let mut path = Vec::new();
    let mut current = Some(input.clone());
    let mut depth = 0;
    while let Some(node) = current {
        if is_scope_root(dom, scope, &node) {
            break;
        }
        let tag = dom.tag_name(&node);
        let Some(index) = dom.sibling_index(&node, true) else {
            return Ok(None);
        };
        path.push(Knot {
            text: nth_of_type(&tag, index),
            // Penalty is never compared on the fallback path.
            penalty: 0,
            level: depth,
        });
        current = dom.parent(&node);
        depth += 1;
    }

    if unique_match(dom, &path, scope).await?.is_some() {
        Ok(Some(path))
    } else {
        debug!(selector = %selector(&path), "positional fallback is not unique");
        Ok(None)
    }
}
