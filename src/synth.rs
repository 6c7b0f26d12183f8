//! Fragment synthesis: all plausible selector tokens for one node
//!
//! Produces the per-level knot list independent of ancestors. Penalties
//! follow the fixed weights in [`crate::types`]: id < class < attribute <
//! tag < nth-of-type < nth-child.

use crate::options::FinderOptions;
use crate::ports::Dom;
use crate::types::{
    Knot, PENALTY_ATTRIBUTE, PENALTY_CLASS, PENALTY_ID, PENALTY_NTH_CHILD, PENALTY_NTH_OF_TYPE,
    PENALTY_TAG_NAME,
};

/// Tag of the document element, rendered as a fixed literal.
pub const HTML_TAG: &str = "html";

/// Generate every selector token the node can contribute to a path.
///
/// The `:nth-child` token is emitted whenever the node has a parent, even
/// when the tag predicate rejects the tag name; it is the token of last
/// resort and keeps the level non-empty for any attached node.
pub fn level_knots<D: Dom>(dom: &D, node: &D::Node, options: &FinderOptions<D::Node>) -> Vec<Knot> {
    let mut level = Vec::new();

    if let Some(id) = dom.id_attr(node) {
        if (options.id_name)(&id) {
            level.push(Knot::new(format!("#{}", dom.escape(&id)), PENALTY_ID));
        }
    }

    for class in dom.class_list(node) {
        if (options.class_name)(&class) {
            level.push(Knot::new(format!(".{}", dom.escape(&class)), PENALTY_CLASS));
        }
    }

    for (name, value) in dom.attributes(node) {
        if (options.attr)(&name, &value) {
            level.push(Knot::new(
                format!("[{}=\"{}\"]", dom.escape(&name), dom.escape(&value)),
                PENALTY_ATTRIBUTE,
            ));
        }
    }

    let tag = dom.tag_name(node);
    if (options.tag_name)(&tag) {
        level.push(Knot::new(tag.clone(), PENALTY_TAG_NAME));

        if let Some(index) = dom.sibling_index(node, true) {
            level.push(Knot::new(nth_of_type(&tag, index), PENALTY_NTH_OF_TYPE));
        }
    }

    if let Some(index) = dom.sibling_index(node, false) {
        level.push(Knot::new(nth_child(&tag, index), PENALTY_NTH_CHILD));
    }

    level
}

/// Render a `tag:nth-of-type(i)` token; the document element stays a bare
/// literal.
pub fn nth_of_type(tag: &str, index: usize) -> String {
    if tag == HTML_TAG {
        return HTML_TAG.to_string();
    }
    format!("{tag}:nth-of-type({index})")
}

/// Render a `tag:nth-child(i)` token; the document element stays a bare
/// literal.
pub fn nth_child(tag: &str, index: usize) -> String {
    if tag == HTML_TAG {
        return HTML_TAG.to_string();
    }
    format!("{tag}:nth-child({index})")
}
