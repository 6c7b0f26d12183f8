//! In-memory DOM backend with a matcher for the emitted selector grammar
//!
//! Reference implementation of the [`Dom`] port: a document tree built
//! programmatically or from a JSON spec, plus query execution for the
//! selector forms the engine renders (`#id`, `.class`, `[name="value"]`,
//! `tag`, `tag:nth-of-type(n)`, `tag:nth-child(n)`, child and descendant
//! combinators). Production embeddings replace this with a real browser
//! backend; tests and headless tooling use it as-is.

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::FinderError;
use crate::ports::Dom;
use crate::types::QueryScope;

/// Handle to a node in a [`MemoryDom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeKind {
    Document,
    Element,
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    tag: String,
    attrs: Vec<(String, String)>,
}

/// An in-memory document tree. Node 0 is the implicit document; elements
/// hang off it (conventionally a single `html` root).
#[derive(Debug, Clone)]
pub struct MemoryDom {
    nodes: Vec<NodeData>,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    /// Create a tree holding only the document node.
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData {
                kind: NodeKind::Document,
                parent: None,
                children: Vec::new(),
                tag: String::new(),
                attrs: Vec::new(),
            }],
        }
    }

    /// The implicit document node.
    pub fn document(&self) -> NodeId {
        NodeId(0)
    }

    /// Append a new element under `parent` and return its handle.
    pub fn append(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            kind: NodeKind::Element,
            parent: Some(parent),
            children: Vec::new(),
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Set an attribute, replacing any existing value for the same name.
    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        let attrs = &mut self.nodes[node.0].attrs;
        match attrs.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = value.to_string(),
            None => attrs.push((name.to_string(), value.to_string())),
        }
    }

    /// Build a tree from a JSON spec of the form
    /// `{"tag": "div", "attrs": {"id": "foo"}, "children": [...]}`.
    pub fn from_json(spec: &Value) -> Result<Self, FinderError> {
        let mut dom = Self::new();
        let document = dom.document();
        dom.append_json(document, spec)?;
        Ok(dom)
    }

    fn append_json(&mut self, parent: NodeId, spec: &Value) -> Result<NodeId, FinderError> {
        let tag = spec
            .get("tag")
            .and_then(Value::as_str)
            .ok_or_else(|| FinderError::Backend("node spec is missing \"tag\"".into()))?;
        let node = self.append(parent, tag);
        if let Some(attrs) = spec.get("attrs").and_then(Value::as_object) {
            for (name, value) in attrs {
                let value = value.as_str().ok_or_else(|| {
                    FinderError::Backend(format!("attribute {name:?} is not a string"))
                })?;
                self.set_attr(node, name, value);
            }
        }
        if let Some(children) = spec.get("children").and_then(Value::as_array) {
            for child in children {
                self.append_json(node, child)?;
            }
        }
        Ok(node)
    }

    /// All elements in document (preorder) order.
    pub fn elements(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_descendants(self.document(), &mut out);
        out
    }

    /// All elements strictly below `node`, preorder.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_descendants(node, &mut out);
        out
    }

    fn collect_descendants(&self, node: NodeId, out: &mut Vec<NodeId>) {
        for &child in &self.nodes[node.0].children {
            out.push(child);
            self.collect_descendants(child, out);
        }
    }

    fn attr_of(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes[node.0]
            .attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    fn matches_simple(&self, node: NodeId, simple: &Simple) -> bool {
        let data = &self.nodes[node.0];
        if data.kind != NodeKind::Element {
            return false;
        }
        match simple {
            Simple::Id(raw) => self
                .attr_of(node, "id")
                .map(|id| css_escape(id) == *raw)
                .unwrap_or(false),
            Simple::Class(raw) => self
                .attr_of(node, "class")
                .map(|classes| classes.split_whitespace().any(|c| css_escape(c) == *raw))
                .unwrap_or(false),
            Simple::Attr { name, value } => data
                .attrs
                .iter()
                .any(|(n, v)| css_escape(n) == *name && css_escape(v) == *value),
            Simple::Tag(tag) => data.tag == *tag,
            Simple::NthOfType { tag, index } => {
                data.tag == *tag && self.index_among_siblings(node, true) == Some(*index)
            }
            Simple::NthChild { tag, index } => {
                data.tag == *tag && self.index_among_siblings(node, false) == Some(*index)
            }
        }
    }

    fn index_among_siblings(&self, node: NodeId, same_tag: bool) -> Option<usize> {
        let parent = self.nodes[node.0].parent?;
        let tag = &self.nodes[node.0].tag;
        let mut index = 0;
        for &child in &self.nodes[parent.0].children {
            if !same_tag || self.nodes[child.0].tag == *tag {
                index += 1;
            }
            if child == node {
                break;
            }
        }
        Some(index)
    }

    fn matches_chain(&self, simples: &[Simple], combinators: &[Combinator], node: NodeId) -> bool {
        let Some((last, init)) = simples.split_last() else {
            return true;
        };
        if !self.matches_simple(node, last) {
            return false;
        }
        if init.is_empty() {
            return true;
        }
        let Some((combinator, rest)) = combinators.split_last() else {
            return false;
        };
        match combinator {
            Combinator::Child => self
                .parent_element(node)
                .map(|p| self.matches_chain(init, rest, p))
                .unwrap_or(false),
            Combinator::Descendant => {
                let mut current = self.parent_element(node);
                while let Some(ancestor) = current {
                    if self.matches_chain(init, rest, ancestor) {
                        return true;
                    }
                    current = self.parent_element(ancestor);
                }
                false
            }
        }
    }

    fn parent_element(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.nodes[node.0].parent?;
        (self.nodes[parent.0].kind == NodeKind::Element).then_some(parent)
    }

    fn query_sync(
        &self,
        selector: &str,
        scope: &QueryScope<NodeId>,
    ) -> Result<Vec<NodeId>, FinderError> {
        let (simples, combinators) = parse_selector(selector)?;
        let candidates = match scope {
            QueryScope::Document => self.elements(),
            QueryScope::Element(root) => self.descendants(*root),
        };
        Ok(candidates
            .into_iter()
            .filter(|&node| self.matches_chain(&simples, &combinators, node))
            .collect())
    }
}

#[async_trait]
impl Dom for MemoryDom {
    type Node = NodeId;

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    fn is_element(&self, node: &NodeId) -> bool {
        self.nodes[node.0].kind == NodeKind::Element
    }

    fn is_document(&self, node: &NodeId) -> bool {
        self.nodes[node.0].kind == NodeKind::Document
    }

    fn tag_name(&self, node: &NodeId) -> String {
        self.nodes[node.0].tag.clone()
    }

    fn id_attr(&self, node: &NodeId) -> Option<String> {
        self.attr_of(*node, "id").map(str::to_string)
    }

    fn class_list(&self, node: &NodeId) -> Vec<String> {
        self.attr_of(*node, "class")
            .map(|classes| classes.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    fn attributes(&self, node: &NodeId) -> Vec<(String, String)> {
        self.nodes[node.0].attrs.clone()
    }

    fn sibling_index(&self, node: &NodeId, same_tag: bool) -> Option<usize> {
        self.index_among_siblings(*node, same_tag)
    }

    fn escape(&self, value: &str) -> String {
        css_escape(value)
    }

    async fn query(
        &self,
        selector: &str,
        scope: &QueryScope<NodeId>,
    ) -> Result<Vec<NodeId>, FinderError> {
        self.query_sync(selector, scope)
    }
}

/// Escape a string into a safe selector literal.
///
/// Unsafe characters use the six-digit `\xxxxxx` form so escapes never carry
/// trailing whitespace; matching compares escaped forms on both sides, so
/// the only requirement is that escaping is deterministic and collision-free.
pub fn css_escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for (i, c) in value.chars().enumerate() {
        let safe = c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii();
        if safe && !(i == 0 && c.is_ascii_digit()) {
            out.push(c);
        } else {
            out.push_str(&format!("\\{:06x}", c as u32));
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Simple {
    Id(String),
    Class(String),
    Attr { name: String, value: String },
    Tag(String),
    NthOfType { tag: String, index: usize },
    NthChild { tag: String, index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

fn parse_selector(selector: &str) -> Result<(Vec<Simple>, Vec<Combinator>), FinderError> {
    let mut simples = Vec::new();
    let mut combinators = Vec::new();
    let mut pending_child = false;
    for token in selector.split_whitespace() {
        if token == ">" {
            if simples.is_empty() || pending_child {
                return Err(FinderError::Backend(format!(
                    "misplaced combinator in selector: {selector}"
                )));
            }
            pending_child = true;
            continue;
        }
        if !simples.is_empty() {
            combinators.push(if pending_child {
                Combinator::Child
            } else {
                Combinator::Descendant
            });
        }
        pending_child = false;
        simples.push(parse_simple(token, selector)?);
    }
    if simples.is_empty() || pending_child {
        return Err(FinderError::Backend(format!(
            "unparsable selector: {selector}"
        )));
    }
    Ok((simples, combinators))
}

fn parse_simple(token: &str, selector: &str) -> Result<Simple, FinderError> {
    if let Some(rest) = token.strip_prefix('#') {
        return Ok(Simple::Id(rest.to_string()));
    }
    if let Some(rest) = token.strip_prefix('.') {
        return Ok(Simple::Class(rest.to_string()));
    }
    if let Some(inner) = token.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
        let (name, rest) = inner.split_once("=\"").ok_or_else(|| {
            FinderError::Backend(format!("unparsable attribute test in selector: {selector}"))
        })?;
        let value = rest.strip_suffix('"').ok_or_else(|| {
            FinderError::Backend(format!("unparsable attribute test in selector: {selector}"))
        })?;
        return Ok(Simple::Attr {
            name: name.to_string(),
            value: value.to_string(),
        });
    }
    if let Some((tag, rest)) = token.split_once(":nth-of-type(") {
        let index = parse_nth_index(rest, selector)?;
        return Ok(Simple::NthOfType {
            tag: tag.to_string(),
            index,
        });
    }
    if let Some((tag, rest)) = token.split_once(":nth-child(") {
        let index = parse_nth_index(rest, selector)?;
        return Ok(Simple::NthChild {
            tag: tag.to_string(),
            index,
        });
    }
    Ok(Simple::Tag(token.to_string()))
}

fn parse_nth_index(rest: &str, selector: &str) -> Result<usize, FinderError> {
    rest.strip_suffix(')')
        .and_then(|n| n.parse().ok())
        .ok_or_else(|| FinderError::Backend(format!("unparsable nth index in selector: {selector}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// html > body > (header#top.site-head, main > (p.intro, p))
    fn sample_dom() -> (MemoryDom, NodeId, NodeId, NodeId) {
        let mut dom = MemoryDom::new();
        let html = dom.append(dom.document(), "html");
        let body = dom.append(html, "body");
        let header = dom.append(body, "header");
        dom.set_attr(header, "id", "top");
        dom.set_attr(header, "class", "site-head");
        let main = dom.append(body, "main");
        let intro = dom.append(main, "p");
        dom.set_attr(intro, "class", "intro");
        let second = dom.append(main, "p");
        (dom, header, intro, second)
    }

    #[test]
    fn test_css_escape_passthrough_and_digits() {
        assert_eq!(css_escape("nav-bar"), "nav-bar");
        assert_eq!(css_escape("main_menu"), "main_menu");
        assert_eq!(css_escape("1abc"), "\\000031abc");
        assert_eq!(css_escape("a:b"), "a\\00003ab");
        assert!(!css_escape("175oi2r").contains(char::is_whitespace));
    }

    #[test]
    fn test_query_by_id_and_class() {
        let (dom, header, intro, _) = sample_dom();
        let scope = QueryScope::Document;
        assert_eq!(dom.query_sync("#top", &scope).unwrap(), vec![header]);
        assert_eq!(dom.query_sync(".intro", &scope).unwrap(), vec![intro]);
        assert_eq!(dom.query_sync(".site-head", &scope).unwrap(), vec![header]);
    }

    #[test]
    fn test_query_by_attribute() {
        let (mut dom, header, _, _) = sample_dom();
        dom.set_attr(header, "role", "banner");
        let scope = QueryScope::Document;
        assert_eq!(
            dom.query_sync("[role=\"banner\"]", &scope).unwrap(),
            vec![header]
        );
        assert!(dom.query_sync("[role=\"nav\"]", &scope).unwrap().is_empty());
    }

    #[test]
    fn test_query_nth_forms() {
        let (dom, _, intro, second) = sample_dom();
        let scope = QueryScope::Document;
        assert_eq!(
            dom.query_sync("p:nth-of-type(1)", &scope).unwrap(),
            vec![intro]
        );
        assert_eq!(
            dom.query_sync("p:nth-of-type(2)", &scope).unwrap(),
            vec![second]
        );
        // header is child 1, main is child 2 of body.
        assert_eq!(dom.query_sync("main:nth-child(2)", &scope).unwrap().len(), 1);
    }

    #[test]
    fn test_query_combinators() {
        let (dom, _, intro, second) = sample_dom();
        let scope = QueryScope::Document;
        assert_eq!(
            dom.query_sync("main > .intro", &scope).unwrap(),
            vec![intro]
        );
        assert_eq!(
            dom.query_sync("body p", &scope).unwrap(),
            vec![intro, second]
        );
        // header has no p children.
        assert!(dom.query_sync("#top > p", &scope).unwrap().is_empty());
    }

    #[test]
    fn test_query_element_scope_excludes_root() {
        let (dom, _, intro, second) = sample_dom();
        let body = dom.parent(&intro).and_then(|m| dom.parent(&m)).unwrap();
        let main = dom.parent(&intro).unwrap();
        let scope = QueryScope::Element(main);
        assert_eq!(dom.query_sync("p", &scope).unwrap(), vec![intro, second]);
        assert!(dom.query_sync("main", &scope).unwrap().is_empty());
        let body_scope = QueryScope::Element(body);
        assert_eq!(dom.query_sync("main", &body_scope).unwrap().len(), 1);
    }

    #[test]
    fn test_parse_rejects_malformed_selectors() {
        let dom = MemoryDom::new();
        let scope = QueryScope::Document;
        assert!(dom.query_sync("", &scope).is_err());
        assert!(dom.query_sync("div >", &scope).is_err());
        assert!(dom.query_sync("> div", &scope).is_err());
        assert!(dom.query_sync("[role=banner]", &scope).is_err());
        assert!(dom.query_sync("li:nth-of-type(x)", &scope).is_err());
    }

    #[test]
    fn test_from_json_builds_tree() {
        let spec = serde_json::json!({
            "tag": "html",
            "children": [{
                "tag": "body",
                "children": [
                    {"tag": "div", "attrs": {"id": "foo"}, "children": [{"tag": "i"}]},
                    {"tag": "div", "attrs": {"id": "foo"}, "children": [{"tag": "i"}]},
                ],
            }],
        });
        let dom = MemoryDom::from_json(&spec).unwrap();
        let scope = QueryScope::Document;
        assert_eq!(dom.query_sync("#foo", &scope).unwrap().len(), 2);
        assert_eq!(dom.query_sync("i", &scope).unwrap().len(), 2);
        assert_eq!(
            dom.query_sync("div:nth-of-type(2) > i", &scope).unwrap().len(),
            1
        );
    }

    #[test]
    fn test_from_json_rejects_bad_specs() {
        assert!(MemoryDom::from_json(&serde_json::json!({"children": []})).is_err());
        let bad_attr = serde_json::json!({"tag": "div", "attrs": {"id": 5}});
        assert!(MemoryDom::from_json(&bad_attr).is_err());
    }

    #[test]
    fn test_sibling_index_views() {
        let (dom, header, intro, second) = sample_dom();
        assert_eq!(dom.sibling_index(&header, false), Some(1));
        assert_eq!(dom.sibling_index(&intro, true), Some(1));
        assert_eq!(dom.sibling_index(&second, true), Some(2));
        let document = dom.document();
        assert_eq!(dom.sibling_index(&document, false), None);
    }
}
