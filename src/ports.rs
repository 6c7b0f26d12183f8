//! Backend port: the tree/query collaborator consumed by the engine
//!
//! The engine never touches a concrete document representation. It reads
//! nodes and runs scoped queries through this trait; `memdom` provides the
//! in-memory reference implementation and a production embedding supplies
//! its own (e.g. a CDP-backed adapter).

use async_trait::async_trait;

use crate::errors::FinderError;
use crate::types::QueryScope;

/// Read-only view of a DOM-like labeled tree plus selector query execution.
///
/// The tree is assumed immutable for the duration of one finder invocation;
/// concurrent mutation gives undefined results.
#[async_trait]
pub trait Dom: Send + Sync {
    /// Opaque node handle.
    type Node: Clone + PartialEq + Send + Sync;

    /// Parent node, if any.
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Whether the node is an element.
    fn is_element(&self, node: &Self::Node) -> bool;

    /// Whether the node is a document (the implicit tree root, not an element).
    fn is_document(&self, node: &Self::Node) -> bool;

    /// Lowercase tag name.
    fn tag_name(&self, node: &Self::Node) -> String;

    /// Value of the id attribute, if present.
    fn id_attr(&self, node: &Self::Node) -> Option<String>;

    /// Class names in the node's own order.
    fn class_list(&self, node: &Self::Node) -> Vec<String>;

    /// All attribute name/value pairs in the node's own order.
    fn attributes(&self, node: &Self::Node) -> Vec<(String, String)>;

    /// 1-based position among element siblings; with `same_tag` the count is
    /// restricted to siblings of the node's own tag. `None` when the node has
    /// no parent.
    fn sibling_index(&self, node: &Self::Node, same_tag: bool) -> Option<usize>;

    /// Escape an arbitrary string into a syntactically safe selector literal.
    fn escape(&self, value: &str) -> String;

    /// Run a selector against the scope, returning every matching element.
    async fn query(
        &self,
        selector: &str,
        scope: &QueryScope<Self::Node>,
    ) -> Result<Vec<Self::Node>, FinderError>;

    /// Determine the broadest consistent query scope for a configured root:
    /// the whole document when no root is given or the root is document-like,
    /// otherwise the root element itself.
    fn resolve_scope(&self, root: Option<&Self::Node>) -> QueryScope<Self::Node> {
        match root {
            Some(node) if !self.is_document(node) => QueryScope::Element(node.clone()),
            _ => QueryScope::Document,
        }
    }
}

/// Whether `node` is the boundary of `scope`; ancestor walks stop here
/// (exclusive).
pub(crate) fn is_scope_root<D: Dom>(dom: &D, scope: &QueryScope<D::Node>, node: &D::Node) -> bool {
    match scope {
        QueryScope::Document => dom.is_document(node),
        QueryScope::Element(root) => node == root,
    }
}
